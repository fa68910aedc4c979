// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Two-player rock-paper-scissors capture-the-flag on a rectangular grid.
//!
//! Each player starts with a block of rock, paper and scissors units near their home
//! corner and a single flag in the corner itself. Units step one cell at a time. Moving
//! onto an enemy unit starts a battle decided by the usual dominance cycle, moving onto
//! the enemy flag wins the game, and mountains scattered across the board block
//! movement entirely.
//!
//! [`setup`] builds the starting [`Board`][board::Board], [`collision`] decides what
//! happens when a unit moves into an occupied cell, and [`game`] drives the turns.

pub mod board;
pub mod collision;
pub mod game;
pub mod setup;
pub mod units;
