// Copyright (C) 2015-2026 The Neo Project.
//
// try_catch.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use neo_vm::{CallFlags, ExecutionEngine, NoSyscalls, OpCode, Script, StackItem, VMState};

fn run(bytes: Vec<u8>) -> ExecutionEngine {
    let mut engine = ExecutionEngine::new(10_000_000);
    engine.load_script(Script::new(bytes), CallFlags::ALL);
    engine.execute(&mut NoSyscalls);
    engine
}

#[test]
fn caught_exception_leaves_handler_result_on_stack() {
    // TRY has no catch-relative target of 0; lay the script out explicitly:
    // 0: TRY    catch=+5 finally=0
    // 2: THROW
    // 3: <unreachable filler so offsets land on real instructions>
    // Layout: TRY(2) THROW(1) then catch body at offset 3: PUSH7 RET
    let try_op = OpCode::Try as u8;
    let throw_op = OpCode::Throw as u8;
    let push7 = OpCode::Push7 as u8;
    let ret = OpCode::Ret as u8;
    // catch offset is relative to the TRY instruction's own start (0).
    // TRY occupies bytes [0,1,2) (opcode + 2 operand bytes), THROW at 3.
    // Catch body starts at byte 4.
    let catch_offset: i8 = 4;
    let bytes = vec![try_op, catch_offset as u8, 0u8, throw_op, push7, ret];
    let engine = run(bytes);
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(engine.result_stack().len(), 1);
    assert!(engine.result_stack()[0].vm_eq(&StackItem::Integer(7.into())));
}

#[test]
fn finally_runs_before_rethrow_when_uncaught() {
    let try_op = OpCode::Try as u8;
    let throw_op = OpCode::Throw as u8;
    let jmp_op = OpCode::Jmp as u8;
    let push9 = OpCode::Push9 as u8;
    let drop_op = OpCode::Drop as u8;
    let endfinally_op = OpCode::EndFinally as u8;

    // 0: TRY catch=0 finally=+6   (2-byte opcode+operands => occupies [0,3))
    // 3: THROW
    // 4: (unreachable JMP filler, never executed; THROW unwinds directly)
    // 6: finally body: PUSH9 DROP ENDFINALLY
    let finally_offset: i8 = 6;
    let bytes = vec![
        try_op, 0u8, finally_offset as u8, // TRY
        throw_op,                          // 3
        jmp_op, 0u8,                       // 4,5 unreachable filler (never executed)
        push9, drop_op, endfinally_op,     // 6,7,8 finally body
    ];
    let engine = run(bytes);
    assert_eq!(engine.state(), VMState::FAULT);
}
