pub mod down_form_orders;
pub mod receive_orders;
pub mod templates;
