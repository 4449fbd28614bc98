// Copyright (c) 2025 Caisse contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod doctor;
pub mod expenses;
pub mod exporter;
pub mod loans;
pub mod projects;
pub mod revenues;
pub mod savings;
