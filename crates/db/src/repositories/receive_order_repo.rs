//! Repository for the `receive_orders` table: raw order ingest and reads.

use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::receive_order::{
    BulkInsertReport, CreateReceiveOrder, OrderFilters, ReceiveOrder,
};

const COLUMNS: &str = "id, idx, order_id, mall_id, mall_user_id, mall_order_id, order_date, \
     order_status, receive_name, receive_cel, receive_tel, receive_addr, receive_zipcode, \
     delv_msg, delivery_method, fld_dsp, mall_product_id, product_id, product_name, sku_value, \
     sale_cnt, pay_cost, delv_cost, mall_won_cost, created_at, updated_at";

const INSERT_COLUMNS: &str = "idx, order_id, mall_id, mall_user_id, mall_order_id, order_date, \
     order_status, receive_name, receive_cel, receive_tel, receive_addr, receive_zipcode, \
     delv_msg, delivery_method, fld_dsp, mall_product_id, product_id, product_name, sku_value, \
     sale_cnt, pay_cost, delv_cost, mall_won_cost";

/// Rows are wide (one column per feed field), so bulk inserts are chunked
/// to stay well under the per-statement parameter ceiling.
pub const BULK_INSERT_BATCH_SIZE: usize = 50;

/// Ingest and read operations for raw order lines.
pub struct ReceiveOrderRepo;

impl ReceiveOrderRepo {
    /// Insert a single raw order line, returning the created row.
    /// A duplicate `idx` surfaces as a unique-constraint error.
    pub async fn create(
        pool: &PgPool,
        input: &CreateReceiveOrder,
    ) -> Result<ReceiveOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO receive_orders ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19, $20, $21, $22, $23) \
             RETURNING {COLUMNS}"
        );
        bind_order_fields(sqlx::query_as::<_, ReceiveOrder>(&query), input)
            .fetch_one(pool)
            .await
    }

    /// Insert-or-update keyed on `idx`: a conflicting row is fully replaced.
    pub async fn upsert(
        pool: &PgPool,
        input: &CreateReceiveOrder,
    ) -> Result<ReceiveOrder, sqlx::Error> {
        let query = format!(
            "INSERT INTO receive_orders ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19, $20, $21, $22, $23) \
             ON CONFLICT (idx) DO UPDATE SET \
                order_id = EXCLUDED.order_id, \
                mall_id = EXCLUDED.mall_id, \
                mall_user_id = EXCLUDED.mall_user_id, \
                mall_order_id = EXCLUDED.mall_order_id, \
                order_date = EXCLUDED.order_date, \
                order_status = EXCLUDED.order_status, \
                receive_name = EXCLUDED.receive_name, \
                receive_cel = EXCLUDED.receive_cel, \
                receive_tel = EXCLUDED.receive_tel, \
                receive_addr = EXCLUDED.receive_addr, \
                receive_zipcode = EXCLUDED.receive_zipcode, \
                delv_msg = EXCLUDED.delv_msg, \
                delivery_method = EXCLUDED.delivery_method, \
                fld_dsp = EXCLUDED.fld_dsp, \
                mall_product_id = EXCLUDED.mall_product_id, \
                product_id = EXCLUDED.product_id, \
                product_name = EXCLUDED.product_name, \
                sku_value = EXCLUDED.sku_value, \
                sale_cnt = EXCLUDED.sale_cnt, \
                pay_cost = EXCLUDED.pay_cost, \
                delv_cost = EXCLUDED.delv_cost, \
                mall_won_cost = EXCLUDED.mall_won_cost, \
                updated_at = now() \
             RETURNING {COLUMNS}"
        );
        bind_order_fields(sqlx::query_as::<_, ReceiveOrder>(&query), input)
            .fetch_one(pool)
            .await
    }

    /// Find a raw order line by its upstream idx.
    pub async fn find_by_idx(
        pool: &PgPool,
        idx: &str,
    ) -> Result<Option<ReceiveOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM receive_orders WHERE idx = $1");
        sqlx::query_as::<_, ReceiveOrder>(&query)
            .bind(idx)
            .fetch_optional(pool)
            .await
    }

    /// List raw order lines in insertion order (id ascending).
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ReceiveOrder>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM receive_orders ORDER BY id ASC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, ReceiveOrder>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Query raw order lines by optional, AND-combined filters.
    pub async fn query(
        pool: &PgPool,
        filters: &OrderFilters,
    ) -> Result<Vec<ReceiveOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM receive_orders \
             WHERE ($1::date IS NULL OR order_date >= $1) \
               AND ($2::date IS NULL OR order_date <= $2) \
               AND ($3::text IS NULL OR mall_id = $3) \
               AND ($4::text IS NULL OR order_status = $4) \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ReceiveOrder>(&query)
            .bind(filters.order_date_from)
            .bind(filters.order_date_to)
            .bind(&filters.mall_id)
            .bind(&filters.order_status)
            .fetch_all(pool)
            .await
    }

    /// Find order lines sharing a shipping address, for combined packaging.
    /// An optional mall user id narrows the match.
    pub async fn find_by_recipient(
        pool: &PgPool,
        receive_zipcode: &str,
        receive_addr: &str,
        receive_name: &str,
        mall_user_id: Option<&str>,
    ) -> Result<Vec<ReceiveOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM receive_orders \
             WHERE receive_zipcode = $1 AND receive_addr = $2 AND receive_name = $3 \
               AND ($4::text IS NULL OR mall_user_id = $4) \
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, ReceiveOrder>(&query)
            .bind(receive_zipcode)
            .bind(receive_addr)
            .bind(receive_name)
            .bind(mall_user_id)
            .fetch_all(pool)
            .await
    }

    /// Idempotent bulk insert: duplicates on `idx` are skipped and counted,
    /// never escalated.
    ///
    /// Rows are inserted in batches of [`BULK_INSERT_BATCH_SIZE`]; each
    /// batch is a single atomic statement, but the overall call is not
    /// atomic across batches — a failure partway through leaves earlier
    /// batches committed. That at-least-partial-success behavior is the
    /// contract, not an accident.
    pub async fn bulk_insert(
        pool: &PgPool,
        orders: &[CreateReceiveOrder],
    ) -> Result<BulkInsertReport, sqlx::Error> {
        let mut report = BulkInsertReport {
            attempted: orders.len(),
            ..Default::default()
        };
        if orders.is_empty() {
            return Ok(report);
        }

        let query = format!(
            "INSERT INTO receive_orders ({INSERT_COLUMNS}) \
             SELECT * FROM UNNEST( \
                $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::date[], \
                $7::text[], $8::text[], $9::text[], $10::text[], $11::text[], $12::text[], \
                $13::text[], $14::text[], $15::text[], $16::text[], $17::text[], $18::text[], \
                $19::text[], $20::int4[], $21::int8[], $22::int8[], $23::int8[]) \
             ON CONFLICT (idx) DO NOTHING \
             RETURNING idx"
        );

        let total_batches = orders.len().div_ceil(BULK_INSERT_BATCH_SIZE);
        for (batch_num, batch) in orders.chunks(BULK_INSERT_BATCH_SIZE).enumerate() {
            let cols = BatchColumns::from_rows(batch);
            let inserted_idx: Vec<(String,)> = sqlx::query_as(&query)
                .bind(&cols.idx)
                .bind(&cols.order_id)
                .bind(&cols.mall_id)
                .bind(&cols.mall_user_id)
                .bind(&cols.mall_order_id)
                .bind(&cols.order_date)
                .bind(&cols.order_status)
                .bind(&cols.receive_name)
                .bind(&cols.receive_cel)
                .bind(&cols.receive_tel)
                .bind(&cols.receive_addr)
                .bind(&cols.receive_zipcode)
                .bind(&cols.delv_msg)
                .bind(&cols.delivery_method)
                .bind(&cols.fld_dsp)
                .bind(&cols.mall_product_id)
                .bind(&cols.product_id)
                .bind(&cols.product_name)
                .bind(&cols.sku_value)
                .bind(&cols.sale_cnt)
                .bind(&cols.pay_cost)
                .bind(&cols.delv_cost)
                .bind(&cols.mall_won_cost)
                .fetch_all(pool)
                .await?;

            let inserted: HashSet<&str> = inserted_idx.iter().map(|(i,)| i.as_str()).collect();
            let (batch_duplicated, batch_duplicated_idx) = duplicate_accounting(batch, &inserted);

            tracing::info!(
                batch = batch_num + 1,
                total_batches,
                inserted = inserted_idx.len(),
                duplicated = batch_duplicated,
                "Bulk insert batch committed"
            );

            report.inserted += inserted_idx.len();
            report.duplicated += batch_duplicated;
            report.duplicated_idx.extend(batch_duplicated_idx);
        }

        tracing::info!(
            attempted = report.attempted,
            inserted = report.inserted,
            duplicated = report.duplicated,
            "Bulk insert finished"
        );
        Ok(report)
    }
}

/// Per-batch duplicate accounting against the idx values a batch statement
/// actually inserted.
///
/// The count is computed by subtraction so the totals always reconcile with
/// `attempted`, including when one batch repeats a new idx (the statement
/// inserts it once; every further occurrence is a duplicate). The detail
/// list only carries idx values the statement skipped outright.
fn duplicate_accounting(
    batch: &[CreateReceiveOrder],
    inserted: &HashSet<&str>,
) -> (usize, Vec<String>) {
    let duplicated = batch.len() - inserted.len();
    let duplicated_idx = batch
        .iter()
        .filter(|o| !inserted.contains(o.idx.as_str()))
        .map(|o| o.idx.clone())
        .collect();
    (duplicated, duplicated_idx)
}

/// Bind the 23 insertable fields in `INSERT_COLUMNS` order.
fn bind_order_fields<'q>(
    query: QueryAs<'q, Postgres, ReceiveOrder, PgArguments>,
    input: &'q CreateReceiveOrder,
) -> QueryAs<'q, Postgres, ReceiveOrder, PgArguments> {
    query
        .bind(&input.idx)
        .bind(&input.order_id)
        .bind(&input.mall_id)
        .bind(&input.mall_user_id)
        .bind(&input.mall_order_id)
        .bind(input.order_date)
        .bind(&input.order_status)
        .bind(&input.receive_name)
        .bind(&input.receive_cel)
        .bind(&input.receive_tel)
        .bind(&input.receive_addr)
        .bind(&input.receive_zipcode)
        .bind(&input.delv_msg)
        .bind(&input.delivery_method)
        .bind(&input.fld_dsp)
        .bind(&input.mall_product_id)
        .bind(&input.product_id)
        .bind(&input.product_name)
        .bind(&input.sku_value)
        .bind(input.sale_cnt)
        .bind(input.pay_cost)
        .bind(input.delv_cost)
        .bind(input.mall_won_cost)
}

/// Column-major view of a batch, matching the UNNEST parameter order.
struct BatchColumns {
    idx: Vec<String>,
    order_id: Vec<Option<String>>,
    mall_id: Vec<Option<String>>,
    mall_user_id: Vec<Option<String>>,
    mall_order_id: Vec<Option<String>>,
    order_date: Vec<Option<NaiveDate>>,
    order_status: Vec<Option<String>>,
    receive_name: Vec<Option<String>>,
    receive_cel: Vec<Option<String>>,
    receive_tel: Vec<Option<String>>,
    receive_addr: Vec<Option<String>>,
    receive_zipcode: Vec<Option<String>>,
    delv_msg: Vec<Option<String>>,
    delivery_method: Vec<Option<String>>,
    fld_dsp: Vec<Option<String>>,
    mall_product_id: Vec<Option<String>>,
    product_id: Vec<Option<String>>,
    product_name: Vec<Option<String>>,
    sku_value: Vec<Option<String>>,
    sale_cnt: Vec<Option<i32>>,
    pay_cost: Vec<Option<i64>>,
    delv_cost: Vec<Option<i64>>,
    mall_won_cost: Vec<Option<i64>>,
}

impl BatchColumns {
    fn from_rows(batch: &[CreateReceiveOrder]) -> Self {
        Self {
            idx: batch.iter().map(|o| o.idx.clone()).collect(),
            order_id: batch.iter().map(|o| o.order_id.clone()).collect(),
            mall_id: batch.iter().map(|o| o.mall_id.clone()).collect(),
            mall_user_id: batch.iter().map(|o| o.mall_user_id.clone()).collect(),
            mall_order_id: batch.iter().map(|o| o.mall_order_id.clone()).collect(),
            order_date: batch.iter().map(|o| o.order_date).collect(),
            order_status: batch.iter().map(|o| o.order_status.clone()).collect(),
            receive_name: batch.iter().map(|o| o.receive_name.clone()).collect(),
            receive_cel: batch.iter().map(|o| o.receive_cel.clone()).collect(),
            receive_tel: batch.iter().map(|o| o.receive_tel.clone()).collect(),
            receive_addr: batch.iter().map(|o| o.receive_addr.clone()).collect(),
            receive_zipcode: batch.iter().map(|o| o.receive_zipcode.clone()).collect(),
            delv_msg: batch.iter().map(|o| o.delv_msg.clone()).collect(),
            delivery_method: batch.iter().map(|o| o.delivery_method.clone()).collect(),
            fld_dsp: batch.iter().map(|o| o.fld_dsp.clone()).collect(),
            mall_product_id: batch.iter().map(|o| o.mall_product_id.clone()).collect(),
            product_id: batch.iter().map(|o| o.product_id.clone()).collect(),
            product_name: batch.iter().map(|o| o.product_name.clone()).collect(),
            sku_value: batch.iter().map(|o| o.sku_value.clone()).collect(),
            sale_cnt: batch.iter().map(|o| o.sale_cnt).collect(),
            pay_cost: batch.iter().map(|o| o.pay_cost).collect(),
            delv_cost: batch.iter().map(|o| o.delv_cost).collect(),
            mall_won_cost: batch.iter().map(|o| o.mall_won_cost).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(idx: &str) -> CreateReceiveOrder {
        CreateReceiveOrder {
            idx: idx.to_string(),
            order_id: None,
            mall_id: None,
            mall_user_id: None,
            mall_order_id: None,
            order_date: None,
            order_status: None,
            receive_name: None,
            receive_cel: None,
            receive_tel: None,
            receive_addr: None,
            receive_zipcode: None,
            delv_msg: None,
            delivery_method: None,
            fld_dsp: None,
            mall_product_id: None,
            product_id: None,
            product_name: None,
            sku_value: None,
            sale_cnt: None,
            pay_cost: None,
            delv_cost: None,
            mall_won_cost: None,
        }
    }

    #[test]
    fn batch_partition_covers_all_rows() {
        let orders: Vec<_> = (0..120).map(|i| order(&format!("idx-{i}"))).collect();
        let batches: Vec<_> = orders.chunks(BULK_INSERT_BATCH_SIZE).collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 50);
        assert_eq!(batches[1].len(), 50);
        assert_eq!(batches[2].len(), 20);
        assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 120);
    }

    #[test]
    fn duplicate_counts_reconcile_with_attempted() {
        // Storage already holds b and d: 3 inserted, 2 duplicated.
        let batch = [order("a"), order("b"), order("c"), order("d"), order("e")];
        let inserted = HashSet::from(["a", "c", "e"]);

        let (duplicated, duplicated_idx) = duplicate_accounting(&batch, &inserted);
        assert_eq!(duplicated, 2);
        assert_eq!(duplicated_idx, ["b", "d"]);
        assert_eq!(inserted.len() + duplicated, batch.len());
    }

    #[test]
    fn repeated_new_idx_within_a_batch_counts_as_duplicate() {
        // The statement inserts the idx once and returns it once; the second
        // occurrence must still show up in the duplicate count.
        let batch = [order("a"), order("a")];
        let inserted = HashSet::from(["a"]);

        let (duplicated, duplicated_idx) = duplicate_accounting(&batch, &inserted);
        assert_eq!(duplicated, 1);
        assert!(duplicated_idx.is_empty());
    }

    #[test]
    fn accounting_sums_across_partitioned_batches() {
        // 120 rows of which 10 collide with stored idx values: 110 inserted,
        // 10 duplicated, regardless of how the batches split them.
        let orders: Vec<_> = (0..120).map(|i| order(&format!("idx-{i}"))).collect();
        let existing: Vec<String> = (0..10).map(|i| format!("idx-{}", i * 7)).collect();
        let existing: HashSet<&str> = existing.iter().map(String::as_str).collect();

        let mut inserted_total = 0;
        let mut duplicated_total = 0;
        for batch in orders.chunks(BULK_INSERT_BATCH_SIZE) {
            let inserted: HashSet<&str> = batch
                .iter()
                .map(|o| o.idx.as_str())
                .filter(|i| !existing.contains(i))
                .collect();
            let (duplicated, _) = duplicate_accounting(batch, &inserted);
            inserted_total += inserted.len();
            duplicated_total += duplicated;
        }

        assert_eq!(inserted_total, 110);
        assert_eq!(duplicated_total, 10);
    }

    #[test]
    fn batch_columns_are_row_aligned() {
        let orders = vec![
            CreateReceiveOrder {
                sale_cnt: Some(2),
                ..order("a")
            },
            order("b"),
        ];
        let cols = BatchColumns::from_rows(&orders);
        assert_eq!(cols.idx, ["a", "b"]);
        assert_eq!(cols.sale_cnt, [Some(2), None]);
        assert_eq!(cols.order_id.len(), 2);
    }
}
