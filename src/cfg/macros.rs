//! 配置相关的宏定义
//!
//! 简化「配置 → 组件 → trait object」这条转换链上的样板代码

/// 为配置类型实现 TryFrom，转调 `Type::new(config)`
///
/// 要求 `Type::new` 返回 `Result<Type, E>`
///
/// 用法：`impl_try_from!(ConfigType => Type, error: ErrorType)`
#[macro_export]
macro_rules! impl_try_from {
    ($config_type:ty => $target_type:ty, error: $error_type:ty) => {
        impl TryFrom<$config_type> for $target_type {
            type Error = $error_type;

            fn try_from(config: $config_type) -> Result<Self, Self::Error> {
                <$target_type>::new(config)
            }
        }
    };
}

/// 为 Box<T> 类型自动实现到 Box<dyn Trait> 的转换
///
/// 用法：`impl_box_from!(Type => dyn TraitName)`
#[macro_export]
macro_rules! impl_box_from {
    ($source_type:ty => dyn $trait_name:path) => {
        impl From<Box<$source_type>> for Box<dyn $trait_name> {
            fn from(source: Box<$source_type>) -> Self {
                source as Box<dyn $trait_name>
            }
        }
    };
}
