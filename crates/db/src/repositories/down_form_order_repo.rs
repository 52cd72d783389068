//! Repository for the `down_form_orders` table: exported order rows.
//!
//! Two read paths with deliberately different, fixed orderings: the listing
//! endpoint pages in insertion order (id ascending) while template-scoped
//! export reads page newest-first (id descending).

use sqlx::{PgPool, Postgres, Transaction};

use oms_core::types::DbId;

use crate::models::down_form_order::{
    CreateDownFormOrder, DownFormOrder, TemplateScope, UpdateDownFormOrder,
};

const COLUMNS: &str = "id, idx, form_name, order_id, mall_id, receive_name, receive_addr, \
     receive_zipcode, receive_cel, delv_msg, product_name, sale_cnt, pay_cost, delv_cost, \
     order_date, created_at, updated_at";

const INSERT_COLUMNS: &str = "idx, form_name, order_id, mall_id, receive_name, receive_addr, \
     receive_zipcode, receive_cel, delv_msg, product_name, sale_cnt, pay_cost, delv_cost, \
     order_date";

/// SQL condition for a listing scope, plus the code to bind as `$1` when
/// the condition references it.
fn scope_condition(scope: &TemplateScope) -> (&'static str, Option<&str>) {
    match scope {
        TemplateScope::All => ("TRUE", None),
        TemplateScope::Untemplated => ("(form_name IS NULL OR form_name = '')", None),
        TemplateScope::Code(code) => ("form_name = $1", Some(code.as_str())),
    }
}

/// Bulk write and paginated read operations for exported order rows.
pub struct DownFormOrderRepo;

impl DownFormOrderRepo {
    /// Paginated listing, scoped by template sentinel, with a total count.
    /// Listing contract: insertion order, id ascending.
    ///
    /// The count and the page run as two statements without a shared
    /// snapshot, so `total` can lag concurrent writes by a request.
    pub async fn list_paginated(
        pool: &PgPool,
        scope: &TemplateScope,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<DownFormOrder>, i64), sqlx::Error> {
        let (condition, code) = scope_condition(scope);

        let count_query = format!("SELECT COUNT(*) FROM down_form_orders WHERE {condition}");
        let mut count = sqlx::query_as::<_, (i64,)>(&count_query);
        if let Some(code) = code {
            count = count.bind(code);
        }
        let (total,) = count.fetch_one(pool).await?;

        // Placeholder numbering shifts by one when the scope binds a code.
        let (limit_ph, offset_ph) = if code.is_some() { ("$2", "$3") } else { ("$1", "$2") };
        let query = format!(
            "SELECT {COLUMNS} FROM down_form_orders WHERE {condition} \
             ORDER BY id ASC LIMIT {limit_ph} OFFSET {offset_ph}"
        );
        let mut select = sqlx::query_as::<_, DownFormOrder>(&query);
        if let Some(code) = code {
            select = select.bind(code);
        }
        let rows = select.bind(limit).bind(offset).fetch_all(pool).await?;

        Ok((rows, total))
    }

    /// Rows exported under exactly `template_code`, newest first (id
    /// descending). Export-read contract; not unified with the listing.
    pub async fn fetch_for_template(
        pool: &PgPool,
        template_code: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DownFormOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM down_form_orders WHERE form_name = $1 \
             ORDER BY id DESC LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, DownFormOrder>(&query)
            .bind(template_code)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Insert a batch of exported rows in one atomic statement, returning
    /// the created ids in input order.
    pub async fn bulk_create(
        pool: &PgPool,
        items: &[CreateDownFormOrder],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if items.is_empty() {
            return Ok(vec![]);
        }

        let query = format!(
            "INSERT INTO down_form_orders ({INSERT_COLUMNS}) \
             SELECT * FROM UNNEST( \
                $1::text[], $2::text[], $3::text[], $4::text[], $5::text[], $6::text[], \
                $7::text[], $8::text[], $9::text[], $10::text[], $11::int4[], $12::int8[], \
                $13::int8[], $14::date[]) \
             RETURNING id"
        );
        let ids: Vec<(DbId,)> = sqlx::query_as(&query)
            .bind(items.iter().map(|i| i.idx.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.form_name.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.order_id.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.mall_id.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.receive_name.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.receive_addr.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.receive_zipcode.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.receive_cel.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.delv_msg.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.product_name.clone()).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.sale_cnt).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.pay_cost).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.delv_cost).collect::<Vec<_>>())
            .bind(items.iter().map(|i| i.order_date).collect::<Vec<_>>())
            .fetch_all(pool)
            .await?;

        tracing::info!(count = ids.len(), "Bulk created down-form orders");
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    /// Update a batch of exported rows in one transaction; only non-`None`
    /// fields are applied per row. All-or-nothing: any failure rolls the
    /// whole batch back. Returns the number of rows that matched.
    pub async fn bulk_update(
        pool: &PgPool,
        items: &[UpdateDownFormOrder],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0u64;
        for item in items {
            updated += Self::update_one(&mut tx, item).await?;
        }
        tx.commit().await?;

        tracing::info!(requested = items.len(), updated, "Bulk updated down-form orders");
        Ok(updated)
    }

    async fn update_one(
        tx: &mut Transaction<'_, Postgres>,
        item: &UpdateDownFormOrder,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE down_form_orders SET \
                form_name = COALESCE($2, form_name), \
                receive_name = COALESCE($3, receive_name), \
                receive_addr = COALESCE($4, receive_addr), \
                receive_zipcode = COALESCE($5, receive_zipcode), \
                receive_cel = COALESCE($6, receive_cel), \
                delv_msg = COALESCE($7, delv_msg), \
                product_name = COALESCE($8, product_name), \
                sale_cnt = COALESCE($9, sale_cnt), \
                pay_cost = COALESCE($10, pay_cost), \
                delv_cost = COALESCE($11, delv_cost), \
                order_date = COALESCE($12, order_date), \
                updated_at = now() \
             WHERE id = $1",
        )
        .bind(item.id)
        .bind(&item.form_name)
        .bind(&item.receive_name)
        .bind(&item.receive_addr)
        .bind(&item.receive_zipcode)
        .bind(&item.receive_cel)
        .bind(&item.delv_msg)
        .bind(&item.product_name)
        .bind(item.sale_cnt)
        .bind(item.pay_cost)
        .bind(item.delv_cost)
        .bind(item.order_date)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete a batch of exported rows by id. Returns the number removed.
    pub async fn bulk_delete(pool: &PgPool, ids: &[DbId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM down_form_orders WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;

        tracing::info!(requested = ids.len(), deleted = result.rows_affected(), "Bulk deleted down-form orders");
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_conditions_match_sentinels() {
        assert_eq!(scope_condition(&TemplateScope::All), ("TRUE", None));
        assert_eq!(
            scope_condition(&TemplateScope::Untemplated),
            ("(form_name IS NULL OR form_name = '')", None)
        );
        let scope = TemplateScope::Code("erp_basic".to_string());
        assert_eq!(scope_condition(&scope), ("form_name = $1", Some("erp_basic")));
    }
}
