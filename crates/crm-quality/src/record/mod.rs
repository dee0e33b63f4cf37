//! Record model.
//!
//! Records are flat field-name to scalar mappings, grouped into batches of
//! one object type. The engine only ever reads them.

mod batch;
mod convert;
mod value;

pub use batch::{Record, RecordBatch};
pub use convert::{
    DtypeCategory, batch_from_dataframe, batch_from_json, dtype_category, is_numeric_dtype,
};
pub use value::{CoercionError, FieldValue};
