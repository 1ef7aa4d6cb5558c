//! Element layouts that map onto glTF accessors
//!
//! Any `Pod` scalar or fixed-size array can be handed to the buffer manager, but only a closed
//! set of layouts is written. Everything else is rejected at push time.

use bytemuck::Pod;
use gltf_json::accessor::{ComponentType, Type};

/// A scalar that can be stored as a glTF accessor component.
pub trait Component: Pod {
    const COMPONENT_TYPE: ComponentType;
}

macro_rules! impl_component {
    ($($ty:ty => $ct:ident),* $(,)?) => {
        $(impl Component for $ty {
            const COMPONENT_TYPE: ComponentType = ComponentType::$ct;
        })*
    };
}

impl_component!(i8 => I8, u8 => U8, i16 => I16, u16 => U16, u32 => U32, f32 => F32);

/// One element of an attribute array: a scalar or a `[C; N]` array of components.
pub trait Element: Pod {
    type Component: Component;
    const ARITY: usize;

    fn format() -> ElementFormat {
        ElementFormat {
            component: Self::Component::COMPONENT_TYPE,
            arity: Self::ARITY,
        }
    }
}

macro_rules! impl_scalar_element {
    ($($ty:ty),*) => {
        $(impl Element for $ty {
            type Component = $ty;
            const ARITY: usize = 1;
        })*
    };
}

impl_scalar_element!(i8, u8, i16, u16, u32, f32);

impl<C: Component, const N: usize> Element for [C; N]
where
    [C; N]: Pod,
{
    type Component = C;
    const ARITY: usize = N;
}

/// Component type and component count of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementFormat {
    pub component: ComponentType,
    pub arity: usize,
}

impl ElementFormat {
    /// Accessor type for this layout, or `None` if the layout is not written.
    ///
    /// Supported: f32 and u32 scalars, f32 x 2/3/4, f32 x 16 (matrices), u16 x 4 (joints).
    pub fn accessor_type(&self) -> Option<Type> {
        match (self.component, self.arity) {
            (ComponentType::F32, 1) | (ComponentType::U32, 1) => Some(Type::Scalar),
            (ComponentType::F32, 2) => Some(Type::Vec2),
            (ComponentType::F32, 3) => Some(Type::Vec3),
            (ComponentType::F32, 4) | (ComponentType::U16, 4) => Some(Type::Vec4),
            (ComponentType::F32, 16) => Some(Type::Mat4),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_layouts() {
        assert_eq!(<f32 as Element>::format().accessor_type(), Some(Type::Scalar));
        assert_eq!(<u32 as Element>::format().accessor_type(), Some(Type::Scalar));
        assert_eq!(<[f32; 2]>::format().accessor_type(), Some(Type::Vec2));
        assert_eq!(<[f32; 3]>::format().accessor_type(), Some(Type::Vec3));
        assert_eq!(<[f32; 4]>::format().accessor_type(), Some(Type::Vec4));
        assert_eq!(<[f32; 16]>::format().accessor_type(), Some(Type::Mat4));
        assert_eq!(<[u16; 4]>::format().accessor_type(), Some(Type::Vec4));
    }

    #[test]
    fn test_unsupported_layouts() {
        assert_eq!(<u16 as Element>::format().accessor_type(), None);
        assert_eq!(<[u8; 4]>::format().accessor_type(), None);
        assert_eq!(<[f32; 5]>::format().accessor_type(), None);
        assert_eq!(<[u32; 3]>::format().accessor_type(), None);
    }

    #[test]
    fn test_format_reports_component_and_arity() {
        let format = <[u16; 4]>::format();
        assert_eq!(format.component, ComponentType::U16);
        assert_eq!(format.arity, 4);
    }
}
