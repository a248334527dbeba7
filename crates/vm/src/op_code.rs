// Copyright (C) 2015-2026 The Neo Project.
//
// op_code.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! The Neo N3 instruction set (spec.md §4.2). Byte values match the
//! reference node's `OpCode` enum so scripts produced by any Neo N3
//! compiler execute unmodified.

/// A single VM instruction byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    // --- Constants ---
    PushInt8 = 0x00,
    PushInt16 = 0x01,
    PushInt32 = 0x02,
    PushInt64 = 0x03,
    PushInt128 = 0x04,
    PushInt256 = 0x05,
    PushT = 0x08,
    PushF = 0x09,
    PushA = 0x0A,
    PushNull = 0x0B,
    PushData1 = 0x0C,
    PushData2 = 0x0D,
    PushData4 = 0x0E,
    PushM1 = 0x0F,
    Push0 = 0x10,
    Push1 = 0x11,
    Push2 = 0x12,
    Push3 = 0x13,
    Push4 = 0x14,
    Push5 = 0x15,
    Push6 = 0x16,
    Push7 = 0x17,
    Push8 = 0x18,
    Push9 = 0x19,
    Push10 = 0x1A,
    Push11 = 0x1B,
    Push12 = 0x1C,
    Push13 = 0x1D,
    Push14 = 0x1E,
    Push15 = 0x1F,
    Push16 = 0x20,

    // --- Flow control ---
    Nop = 0x21,
    Jmp = 0x22,
    JmpL = 0x23,
    JmpIf = 0x24,
    JmpIfL = 0x25,
    JmpIfNot = 0x26,
    JmpIfNotL = 0x27,
    JmpEq = 0x28,
    JmpEqL = 0x29,
    JmpNe = 0x2A,
    JmpNeL = 0x2B,
    JmpGt = 0x2C,
    JmpGtL = 0x2D,
    JmpGe = 0x2E,
    JmpGeL = 0x2F,
    JmpLt = 0x30,
    JmpLtL = 0x31,
    JmpLe = 0x32,
    JmpLeL = 0x33,
    Call = 0x34,
    CallL = 0x35,
    CallA = 0x36,
    CallT = 0x37,
    Abort = 0x38,
    Assert = 0x39,
    Throw = 0x3A,
    Try = 0x3B,
    TryL = 0x3C,
    EndTry = 0x3D,
    EndTryL = 0x3E,
    EndFinally = 0x3F,
    Ret = 0x40,
    Syscall = 0x41,

    // --- Stack ---
    Depth = 0x43,
    Drop = 0x45,
    Nip = 0x46,
    Xdrop = 0x48,
    Clear = 0x49,
    Dup = 0x4A,
    Over = 0x4B,
    Pick = 0x4D,
    Tuck = 0x4E,
    Swap = 0x50,
    Rot = 0x51,
    Roll = 0x52,
    Reverse3 = 0x53,
    Reverse4 = 0x54,
    ReverseN = 0x55,

    // --- Slots ---
    InitSSlot = 0x56,
    InitSlot = 0x57,
    LdSFld0 = 0x58,
    LdSFld = 0x5D,
    StSFld0 = 0x5E,
    StSFld = 0x63,
    LdLoc0 = 0x64,
    LdLoc = 0x69,
    StLoc0 = 0x6A,
    StLoc = 0x6F,
    LdArg0 = 0x70,
    LdArg = 0x75,
    StArg0 = 0x76,
    StArg = 0x7B,

    // --- Splice ---
    NewBuffer = 0x88,
    MemCpy = 0x89,
    Cat = 0x8B,
    Substr = 0x8C,
    Left = 0x8D,
    Right = 0x8E,

    // --- Bitwise logic ---
    Invert = 0x90,
    And = 0x91,
    Or = 0x92,
    Xor = 0x93,
    Equal = 0x97,
    NotEqual = 0x98,

    // --- Arithmetic ---
    Sign = 0x99,
    Abs = 0x9A,
    Negate = 0x9B,
    Inc = 0x9C,
    Dec = 0x9D,
    Add = 0x9E,
    Sub = 0x9F,
    Mul = 0xA0,
    Div = 0xA1,
    Mod = 0xA2,
    Pow = 0xA3,
    Sqrt = 0xA4,
    ModMul = 0xA5,
    ModPow = 0xA6,
    Shl = 0xA8,
    Shr = 0xA9,
    Not = 0xAA,
    BoolAnd = 0xAB,
    BoolOr = 0xAC,
    Nz = 0xB1,
    NumEqual = 0xB3,
    NumNotEqual = 0xB4,
    Lt = 0xB5,
    Le = 0xB6,
    Gt = 0xB7,
    Ge = 0xB8,
    Min = 0xB9,
    Max = 0xBA,
    Within = 0xBB,

    // --- Compound types ---
    PackMap = 0xBE,
    PackStruct = 0xBF,
    Pack = 0xC0,
    Unpack = 0xC1,
    NewArray0 = 0xC2,
    NewArray = 0xC3,
    NewArrayT = 0xC4,
    NewStruct0 = 0xC5,
    NewStruct = 0xC6,
    NewMap = 0xC8,
    Size = 0xCA,
    HasKey = 0xCB,
    Keys = 0xCC,
    Values = 0xCD,
    PickItem = 0xCE,
    Append = 0xCF,
    SetItem = 0xD0,
    ReverseItems = 0xD1,
    Remove = 0xD2,
    ClearItems = 0xD3,
    PopItem = 0xD4,

    // --- Types ---
    IsNull = 0xD8,
    IsType = 0xD9,
    Convert = 0xDB,
}

impl OpCode {
    /// Decodes a raw byte into an `OpCode`.
    pub fn from_byte(byte: u8) -> Option<Self> {
        // Safety-free decode: match against every known discriminant. A
        // `repr(u8)` transmute would accept byte values the instruction set
        // doesn't define.
        ALL.iter().copied().find(|op| *op as u8 == byte)
    }

    /// Number of immediate operand bytes this instruction consumes, not
    /// counting any trailing VarInt-style length prefix (`PushData*` and
    /// `NewArrayT`/`IsType`/`Convert` have fixed-size operands; `CallT`
    /// takes a 2-byte token; jumps take either 1 or 4 signed bytes).
    pub fn fixed_operand_size(self) -> usize {
        use OpCode::*;
        match self {
            PushInt8 => 1,
            PushInt16 => 2,
            PushInt32 | PushA => 4,
            PushInt64 => 8,
            PushInt128 => 16,
            PushInt256 => 32,
            Jmp | JmpIf | JmpIfNot | JmpEq | JmpNe | JmpGt | JmpGe | JmpLt | JmpLe | Call
            | EndTry => 1,
            JmpL | JmpIfL | JmpIfNotL | JmpEqL | JmpNeL | JmpGtL | JmpGeL | JmpLtL | JmpLeL
            | CallL | EndTryL => 4,
            Try => 2,
            TryL => 8,
            CallA => 4,
            CallT => 2,
            Syscall => 4,
            InitSSlot => 1,
            InitSlot => 2,
            LdSFld | StSFld | LdLoc | StLoc | LdArg | StArg | NewArrayT | IsType | Convert => 1,
            Pick | Roll | ReverseN | Xdrop => 0,
            PushData1 => 0, // length-prefixed: 1-byte length + data
            PushData2 => 0, // 2-byte length + data
            PushData4 => 0, // 4-byte length + data
            _ => 0,
        }
    }

    /// True for the three `PushData*` opcodes, whose operand is a
    /// length-prefixed byte string rather than a fixed-width immediate.
    pub fn is_push_data(self) -> bool {
        matches!(self, OpCode::PushData1 | OpCode::PushData2 | OpCode::PushData4)
    }
}

const ALL: &[OpCode] = &[
    OpCode::PushInt8, OpCode::PushInt16, OpCode::PushInt32, OpCode::PushInt64, OpCode::PushInt128, OpCode::PushInt256,
    OpCode::PushT, OpCode::PushF, OpCode::PushA, OpCode::PushNull, OpCode::PushData1, OpCode::PushData2, OpCode::PushData4,
    OpCode::PushM1, OpCode::Push0, OpCode::Push1, OpCode::Push2, OpCode::Push3, OpCode::Push4, OpCode::Push5, OpCode::Push6,
    OpCode::Push7, OpCode::Push8, OpCode::Push9, OpCode::Push10, OpCode::Push11, OpCode::Push12, OpCode::Push13,
    OpCode::Push14, OpCode::Push15, OpCode::Push16,
    OpCode::Nop, OpCode::Jmp, OpCode::JmpL, OpCode::JmpIf, OpCode::JmpIfL, OpCode::JmpIfNot, OpCode::JmpIfNotL,
    OpCode::JmpEq, OpCode::JmpEqL, OpCode::JmpNe, OpCode::JmpNeL, OpCode::JmpGt, OpCode::JmpGtL, OpCode::JmpGe,
    OpCode::JmpGeL, OpCode::JmpLt, OpCode::JmpLtL, OpCode::JmpLe, OpCode::JmpLeL, OpCode::Call, OpCode::CallL,
    OpCode::CallA, OpCode::CallT, OpCode::Abort, OpCode::Assert, OpCode::Throw, OpCode::Try, OpCode::TryL,
    OpCode::EndTry, OpCode::EndTryL, OpCode::EndFinally, OpCode::Ret, OpCode::Syscall,
    OpCode::Depth, OpCode::Drop, OpCode::Nip, OpCode::Xdrop, OpCode::Clear, OpCode::Dup, OpCode::Over, OpCode::Pick,
    OpCode::Tuck, OpCode::Swap, OpCode::Rot, OpCode::Roll, OpCode::Reverse3, OpCode::Reverse4, OpCode::ReverseN,
    OpCode::InitSSlot, OpCode::InitSlot, OpCode::LdSFld0, OpCode::LdSFld, OpCode::StSFld0, OpCode::StSFld,
    OpCode::LdLoc0, OpCode::LdLoc, OpCode::StLoc0, OpCode::StLoc, OpCode::LdArg0, OpCode::LdArg, OpCode::StArg0,
    OpCode::StArg,
    OpCode::NewBuffer, OpCode::MemCpy, OpCode::Cat, OpCode::Substr, OpCode::Left, OpCode::Right,
    OpCode::Invert, OpCode::And, OpCode::Or, OpCode::Xor, OpCode::Equal, OpCode::NotEqual,
    OpCode::Sign, OpCode::Abs, OpCode::Negate, OpCode::Inc, OpCode::Dec, OpCode::Add, OpCode::Sub, OpCode::Mul,
    OpCode::Div, OpCode::Mod, OpCode::Pow, OpCode::Sqrt, OpCode::ModMul, OpCode::ModPow, OpCode::Shl, OpCode::Shr,
    OpCode::Not, OpCode::BoolAnd, OpCode::BoolOr, OpCode::Nz, OpCode::NumEqual, OpCode::NumNotEqual, OpCode::Lt,
    OpCode::Le, OpCode::Gt, OpCode::Ge, OpCode::Min, OpCode::Max, OpCode::Within,
    OpCode::PackMap, OpCode::PackStruct, OpCode::Pack, OpCode::Unpack, OpCode::NewArray0, OpCode::NewArray,
    OpCode::NewArrayT, OpCode::NewStruct0, OpCode::NewStruct, OpCode::NewMap, OpCode::Size, OpCode::HasKey,
    OpCode::Keys, OpCode::Values, OpCode::PickItem, OpCode::Append, OpCode::SetItem, OpCode::ReverseItems,
    OpCode::Remove, OpCode::ClearItems, OpCode::PopItem,
    OpCode::IsNull, OpCode::IsType, OpCode::Convert,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_opcode_round_trips_through_its_byte_value() {
        for op in ALL {
            assert_eq!(OpCode::from_byte(*op as u8), Some(*op));
        }
    }

    #[test]
    fn unknown_byte_decodes_to_none() {
        assert_eq!(OpCode::from_byte(0xFF), None);
    }
}
