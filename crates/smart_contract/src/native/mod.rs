// Copyright (C) 2015-2026 The Neo Project.
//
// mod.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Native contracts (spec.md §2 C6): contracts implemented in Rust rather
//! than NeoVM bytecode, invoked directly by the application engine instead
//! of through `CALL`.

pub mod contract_management;
pub mod crypto_lib;
pub mod fungible;
pub mod gas_token;
pub mod ledger_contract;
pub mod native_contract;
pub mod neo_token;
pub mod oracle_contract;
pub mod policy_contract;
pub mod role_management;
pub mod std_lib;

pub use contract_management::ContractManagement;
pub use crypto_lib::CryptoLib;
pub use gas_token::GasToken;
pub use ledger_contract::LedgerContract;
pub use native_contract::{native_hash, NativeContract, NativeRegistry};
pub use neo_token::NeoToken;
pub use oracle_contract::OracleContract;
pub use policy_contract::PolicyContract;
pub use role_management::{Role, RoleManagement};
pub use std_lib::StdLib;
