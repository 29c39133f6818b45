// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod extract;
pub mod init;
pub mod inspect;
pub mod transform;

pub use extract::{ExtractArgs, extract_command};
pub use init::init_command;
pub use inspect::{InspectArgs, inspect_command};
pub use transform::{SelectionArg, TransformArgs, transform_command};
