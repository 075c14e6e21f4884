pub mod alert;
pub mod card;
pub mod column;
pub mod dashboard;
pub mod form_template;
pub mod polo;
pub mod project;
pub mod sales_funnel;
