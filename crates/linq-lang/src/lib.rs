//! Value model, intervals, and the operator/combinator catalog for the LINQ
//! list DSL.

pub mod catalog;
pub mod function;
pub mod interval;
pub mod ops;
pub mod value;

pub use catalog::{scan_of, Catalog};
pub use function::{ApplyError, Function, Signature, TransferContext};
pub use interval::Interval;
pub use ops::{BinaryOp, Predicate, ScalarOp, UnaryOp};
pub use value::{Kind, UnknownKind, Value};
