pub(crate) mod dot;
pub(crate) mod llvm;
pub(crate) mod tokens;
