use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use super::{Reflect, TypeDesc};

macro_rules! scalar {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn describe() -> TypeDesc {
                    TypeDesc::scalar($name)
                }
            }
        )*
    };
}

scalar! {
    bool => "bool",
    char => "string",
    str => "string",
    String => "string",
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    isize => "int",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    usize => "uint",
    f32 => "float32",
    f64 => "float64",
    serde_json::Value => "any",
}

macro_rules! pointer {
    ($($ty:ident),*) => {
        $(
            impl<T: Reflect + ?Sized> Reflect for $ty<T> {
                fn describe() -> TypeDesc {
                    TypeDesc::pointer(<T as Reflect>::describe)
                }
            }
        )*
    };
}

pointer!(Box, Arc, Rc);

impl<T: Reflect> Reflect for Option<T> {
    fn describe() -> TypeDesc {
        TypeDesc::pointer(<T as Reflect>::describe)
    }
}

impl<T: Reflect + ?Sized> Reflect for &T {
    fn describe() -> TypeDesc {
        TypeDesc::pointer(<T as Reflect>::describe)
    }
}

macro_rules! array {
    ($($ty:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $ty<T> {
                fn describe() -> TypeDesc {
                    TypeDesc::array(<T as Reflect>::describe)
                }
            }
        )*
    };
}

array!(Vec, VecDeque, HashSet, BTreeSet);

impl<T: Reflect> Reflect for [T] {
    fn describe() -> TypeDesc {
        TypeDesc::array(<T as Reflect>::describe)
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn describe() -> TypeDesc {
        TypeDesc::array(<T as Reflect>::describe)
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn describe() -> TypeDesc {
        TypeDesc::map(<K as Reflect>::describe, <V as Reflect>::describe)
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn describe() -> TypeDesc {
        TypeDesc::map(<K as Reflect>::describe, <V as Reflect>::describe)
    }
}
