//! cfg 模块 - 配置管理
//!
//! 组件通过 `{ type, options }` 形式的 TypeOptions 描述，
//! 经由注册表按类型名称创建为 trait object

mod macros;
pub mod registry;
pub mod type_options;

pub use registry::{create_trait_from_type_options, register_trait};
pub use type_options::TypeOptions;
