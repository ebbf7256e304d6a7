#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
mod bitwise;

pub mod cpu;

#[allow(clippy::module_name_repetitions)]
pub mod diagnostics;

#[allow(clippy::module_name_repetitions)]
pub mod errors;

#[allow(clippy::cast_possible_truncation)]
pub mod memory;
