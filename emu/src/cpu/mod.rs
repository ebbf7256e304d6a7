pub mod arm;

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::module_name_repetitions)]
pub mod arm7tdmi;

#[allow(clippy::module_name_repetitions)]
pub mod pipeline;

#[allow(clippy::cast_possible_truncation)]
pub mod psr;

#[allow(clippy::cast_possible_truncation)]
pub mod registers;
