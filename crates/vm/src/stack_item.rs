// Copyright (C) 2015-2026 The Neo Project.
//
// stack_item.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Stack item values (spec.md §4.2). A tagged enum replaces the reference
//! implementation's class hierarchy (spec.md §9); compound variants hold
//! `Rc<RefCell<_>>` handles so `DUP`/`STLOC`/etc. share the underlying
//! storage the way the reference VM's object identity does, without
//! reaching for an engine-wide arena.

use crate::error::{VmError, VmResult};
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Maximum size in bytes of a `Buffer`/`ByteString` (spec.md §4.2).
pub const MAX_ITEM_SIZE: usize = 1024 * 1024;

/// An opaque host object exposed to scripts as an `InteropInterface`.
pub trait InteropInterface: fmt::Debug {
    /// The interop interface's type name, used by `System.Runtime`-style
    /// syscalls that need to distinguish host object kinds.
    fn type_name(&self) -> &'static str;

    /// Downcasts to a concrete host type.
    fn as_any(&self) -> &dyn Any;
}

/// A compound item's backing storage: an ordered, mutable list of items
/// shared by every `StackItem::Array`/`Struct` handle pointing at it.
pub type ArrayRef = Rc<RefCell<Vec<StackItem>>>;

/// A `Map`'s backing storage. Ordered by insertion, matching spec.md §4.2;
/// implemented as a `Vec` of pairs rather than a `BTreeMap` because
/// `StackItem` keys don't have a total order independent of VM semantics
/// (two `Integer`s compare numerically, but an `Integer` and a
/// `ByteString` have no defined relative order) — insertion order plus
/// linear key lookup is what the reference VM does for small maps.
pub type MapRef = Rc<RefCell<Vec<(StackItem, StackItem)>>>;

/// A value on the Neo VM's evaluation stack.
#[derive(Clone)]
pub enum StackItem {
    Null,
    Boolean(bool),
    Integer(BigInt),
    ByteString(Rc<Vec<u8>>),
    Buffer(Rc<RefCell<Vec<u8>>>),
    Array(ArrayRef),
    Struct(ArrayRef),
    Map(MapRef),
    Pointer { script_hash: [u8; 20], position: u32 },
    InteropInterface(Rc<dyn InteropInterface>),
}

impl fmt::Debug for StackItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackItem::Null => write!(f, "Null"),
            StackItem::Boolean(b) => write!(f, "Boolean({b})"),
            StackItem::Integer(i) => write!(f, "Integer({i})"),
            StackItem::ByteString(b) => write!(f, "ByteString(len={})", b.len()),
            StackItem::Buffer(b) => write!(f, "Buffer(len={})", b.borrow().len()),
            StackItem::Array(a) => write!(f, "Array(len={})", a.borrow().len()),
            StackItem::Struct(a) => write!(f, "Struct(len={})", a.borrow().len()),
            StackItem::Map(m) => write!(f, "Map(len={})", m.borrow().len()),
            StackItem::Pointer { position, .. } => write!(f, "Pointer(@{position})"),
            StackItem::InteropInterface(i) => write!(f, "InteropInterface({})", i.type_name()),
        }
    }
}

impl StackItem {
    /// Constructs a byte-string item, the immutable counterpart to `Buffer`.
    pub fn byte_string(bytes: Vec<u8>) -> Self {
        StackItem::ByteString(Rc::new(bytes))
    }

    /// Constructs a mutable buffer item.
    pub fn buffer(bytes: Vec<u8>) -> Self {
        StackItem::Buffer(Rc::new(RefCell::new(bytes)))
    }

    /// Constructs an empty array item.
    pub fn array(items: Vec<StackItem>) -> Self {
        StackItem::Array(Rc::new(RefCell::new(items)))
    }

    /// Constructs a struct item.
    pub fn new_struct(items: Vec<StackItem>) -> Self {
        StackItem::Struct(Rc::new(RefCell::new(items)))
    }

    /// Short type name, used in error messages and `System.Runtime` type
    /// reflection syscalls.
    pub fn type_name(&self) -> &'static str {
        match self {
            StackItem::Null => "Null",
            StackItem::Boolean(_) => "Boolean",
            StackItem::Integer(_) => "Integer",
            StackItem::ByteString(_) => "ByteString",
            StackItem::Buffer(_) => "Buffer",
            StackItem::Array(_) => "Array",
            StackItem::Struct(_) => "Struct",
            StackItem::Map(_) => "Map",
            StackItem::Pointer { .. } => "Pointer",
            StackItem::InteropInterface(_) => "InteropInterface",
        }
    }

    /// Converts to a boolean the way `JMPIF`/`ASSERT` do: zero-length byte
    /// strings and zero integers are falsy, `Null` is falsy, everything
    /// else (including empty arrays) is truthy.
    pub fn as_bool(&self) -> bool {
        match self {
            StackItem::Null => false,
            StackItem::Boolean(b) => *b,
            StackItem::Integer(i) => !i.is_zero(),
            StackItem::ByteString(b) => b.iter().any(|byte| *byte != 0),
            StackItem::Buffer(b) => b.borrow().iter().any(|byte| *byte != 0),
            _ => true,
        }
    }

    /// Converts to an integer, as `CONVERT`/arithmetic opcodes require.
    pub fn as_int(&self) -> VmResult<BigInt> {
        match self {
            StackItem::Integer(i) => Ok(i.clone()),
            StackItem::Boolean(b) => Ok(BigInt::from(*b as u8)),
            StackItem::ByteString(b) => Ok(bytes_to_bigint(b)),
            StackItem::Buffer(b) => Ok(bytes_to_bigint(&b.borrow())),
            other => Err(VmError::InvalidCast {
                from: other.type_name(),
                to: "Integer",
            }),
        }
    }

    /// Converts to a byte slice view, copying out of mutable buffers.
    pub fn as_bytes(&self) -> VmResult<Vec<u8>> {
        match self {
            StackItem::ByteString(b) => Ok(b.as_ref().clone()),
            StackItem::Buffer(b) => Ok(b.borrow().clone()),
            StackItem::Integer(i) => Ok(bigint_to_bytes(i)),
            StackItem::Boolean(b) => Ok(vec![*b as u8]),
            other => Err(VmError::InvalidCast {
                from: other.type_name(),
                to: "ByteString",
            }),
        }
    }

    /// Deep-ish equality: `Integer`/`Boolean`/`ByteString` compare by
    /// value; `Array`/`Map`/`Buffer`/`InteropInterface` compare by
    /// reference identity; `Struct` compares elementwise, recursively
    /// (spec.md §4.2 "identity-equal only to other Structs of equal
    /// length and elementwise equality").
    pub fn vm_eq(&self, other: &StackItem) -> bool {
        match (self, other) {
            (StackItem::Null, StackItem::Null) => true,
            (StackItem::Boolean(a), StackItem::Boolean(b)) => a == b,
            (StackItem::Integer(a), StackItem::Integer(b)) => a == b,
            (StackItem::ByteString(a), StackItem::ByteString(b)) => a == b,
            (StackItem::Buffer(a), StackItem::Buffer(b)) => Rc::ptr_eq(a, b),
            (StackItem::Array(a), StackItem::Array(b)) => Rc::ptr_eq(a, b),
            (StackItem::Map(a), StackItem::Map(b)) => Rc::ptr_eq(a, b),
            (StackItem::Struct(a), StackItem::Struct(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.vm_eq(y))
            }
            (StackItem::InteropInterface(a), StackItem::InteropInterface(b)) => {
                Rc::ptr_eq(a, b)
            }
            (StackItem::Pointer { script_hash: h1, position: p1 }, StackItem::Pointer { script_hash: h2, position: p2 }) => {
                h1 == h2 && p1 == p2
            }
            _ => false,
        }
    }

    /// Number of item "slots" this value charges against
    /// [`crate::reference_counter::ReferenceCounter`]: 1 for scalars, plus
    /// every element for compound types (recursively, since `DUP` shares
    /// the handle rather than deep-copying, but a freshly built
    /// array/struct/map charges for everything it was just built from).
    pub fn slot_count(&self) -> usize {
        match self {
            StackItem::Array(a) | StackItem::Struct(a) => {
                1 + a.borrow().iter().map(StackItem::slot_count).sum::<usize>()
            }
            StackItem::Map(m) => {
                1 + m
                    .borrow()
                    .iter()
                    .map(|(k, v)| k.slot_count() + v.slot_count())
                    .sum::<usize>()
            }
            _ => 1,
        }
    }
}

fn bytes_to_bigint(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        return BigInt::zero();
    }
    BigInt::from_signed_bytes_le(bytes)
}

fn bigint_to_bytes(value: &BigInt) -> Vec<u8> {
    if value.is_zero() {
        return Vec::new();
    }
    value.to_signed_bytes_le()
}

/// Clamps a `BigInt` index into a `usize`, failing for negative or
/// unrepresentable values (used by `PICKITEM`/`ROLL`/`PICK`).
pub fn index_to_usize(value: &BigInt) -> VmResult<usize> {
    value.to_usize().ok_or_else(|| VmError::InvalidCast {
        from: "Integer",
        to: "usize index",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_equality_is_elementwise() {
        let a = StackItem::new_struct(vec![StackItem::Integer(1.into())]);
        let b = StackItem::new_struct(vec![StackItem::Integer(1.into())]);
        assert!(a.vm_eq(&b));
        let c = StackItem::new_struct(vec![StackItem::Integer(2.into())]);
        assert!(!a.vm_eq(&c));
    }

    #[test]
    fn array_equality_is_by_identity() {
        let a = StackItem::array(vec![StackItem::Integer(1.into())]);
        let b = StackItem::array(vec![StackItem::Integer(1.into())]);
        assert!(!a.vm_eq(&b));
        assert!(a.vm_eq(&a.clone()));
    }

    #[test]
    fn falsy_values_match_reference_semantics() {
        assert!(!StackItem::Integer(0.into()).as_bool());
        assert!(!StackItem::Null.as_bool());
        assert!(!StackItem::byte_string(vec![0, 0]).as_bool());
        assert!(StackItem::array(vec![]).as_bool());
    }

    #[test]
    fn integer_byte_round_trip() {
        let value = BigInt::from(-42);
        let item = StackItem::Integer(value.clone());
        let bytes = item.as_bytes().unwrap();
        let back = StackItem::byte_string(bytes).as_int().unwrap();
        assert_eq!(back, value);
    }
}
