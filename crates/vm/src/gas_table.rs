// Copyright (C) 2015-2026 The Neo Project.
//
// gas_table.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Per-opcode gas costs in datoshi (spec.md §4.2, §8 scenario boundary:
//! "A VM executing exactly gas_limit units halts; one extra unit faults").
//! Costs are grouped the way the reference node groups them: cheap
//! stack/flow-control opcodes, mid-cost arithmetic, and expensive
//! compound-type or cryptographic operations.

use crate::op_code::OpCode;

const OPCODE_PRICE_0: i64 = 1 << 0;
const OPCODE_PRICE_1: i64 = 1 << 4;
const OPCODE_PRICE_2: i64 = 1 << 8;
const OPCODE_PRICE_3: i64 = 1 << 15;
const OPCODE_PRICE_4: i64 = 1 << 16;

/// Base gas cost of executing `opcode`, excluding any syscall's own cost
/// (syscall costs are looked up separately, keyed by syscall hash).
pub fn opcode_price(opcode: OpCode) -> i64 {
    use OpCode::*;
    match opcode {
        PushInt8 | PushInt16 | PushInt32 | PushInt64 | PushInt128 | PushInt256 | PushT | PushF
        | PushNull | PushM1 | Push0 | Push1 | Push2 | Push3 | Push4 | Push5 | Push6 | Push7
        | Push8 | Push9 | Push10 | Push11 | Push12 | Push13 | Push14 | Push15 | Push16 | Nop
        | Depth | Drop | Nip | Clear | Dup | Over | Tuck | Swap | Rot | Reverse3 | Reverse4
        | IsNull => OPCODE_PRICE_0,

        PushA | PushData1 | Jmp | JmpL | JmpIf | JmpIfL | JmpIfNot | JmpIfNotL | JmpEq
        | JmpEqL | JmpNe | JmpNeL | JmpGt | JmpGtL | JmpGe | JmpGeL | JmpLt | JmpLtL | JmpLe
        | JmpLeL | Call | CallL | Ret | Xdrop | Pick | Roll | ReverseN | InitSSlot | InitSlot
        | LdSFld0 | LdSFld | StSFld0 | StSFld | LdLoc0 | LdLoc | StLoc0 | StLoc | LdArg0
        | LdArg | StArg0 | StArg | Invert | Sign | Abs | Negate | Inc | Dec | Not | Nz
        | Equal | NotEqual | And | Or | Xor | NumEqual | NumNotEqual | Lt | Le | Gt | Ge
        | Min | Max | Within | BoolAnd | BoolOr | IsType | Convert | NewArray0 | NewStruct0
        | NewMap | PackMap | PackStruct | Pack | Unpack | HasKey | Keys | ClearItems => {
            OPCODE_PRICE_1
        }

        PushData2 | CallA | CallT | Abort | Assert | Throw | Try | TryL | EndTry | EndTryL
        | EndFinally | Add | Sub | Mul | Div | Mod | Shl | Shr | Size | Values | Append
        | SetItem | ReverseItems | Remove | PopItem | NewArray | NewArrayT | NewStruct
        | PickItem | MemCpy | Cat | Substr | Left | Right | NewBuffer => OPCODE_PRICE_2,

        Pow | ModMul => OPCODE_PRICE_3,

        PushData4 | Sqrt | ModPow | Syscall => OPCODE_PRICE_4,
    }
}
