//! 测试数据生成器

pub mod data_generator;

pub use data_generator::{DataGenerator, GenerationStats, GeneratorConfig};
