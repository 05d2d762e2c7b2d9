pub mod form_table_adapter;
pub mod load_order_adapter;
pub mod resource_adapter;

pub use form_table_adapter::FormTable;
pub use load_order_adapter::LoadOrder;
pub use resource_adapter::FsResourceProvider;
