//! Position to logical address codecs, one per table layout.

pub mod columns;
pub mod io;
pub mod parameter;
pub mod variable;

#[cfg(test)]
mod io_test;
#[cfg(test)]
mod parameter_test;
#[cfg(test)]
mod variable_test;

pub use io::{IoAddress, IoBank, IoNameTable};
pub use parameter::{ParameterAddress, ParameterCodec, ParameterValues};
pub use variable::{VarNameTable, VarType, VariableAddress};
