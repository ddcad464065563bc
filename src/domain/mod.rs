pub mod benchmarks;
pub mod cnpj;
pub mod fixtures;
pub mod models;
pub mod states;
