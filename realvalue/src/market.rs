// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

use serde::Serialize;

use crate::data::Neighborhood;

/// Static market figures for one neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarketSnapshot {
    pub avg_price: u32,
    pub trend: &'static str,
    pub days_on_market: u32,
}

impl Neighborhood {
    pub fn market(self) -> MarketSnapshot {
        let (avg_price, trend, days_on_market) = match self {
            Neighborhood::Downtown => (320_000, "+2.5%", 15),
            Neighborhood::Suburb => (280_000, "+1.8%", 20),
            Neighborhood::Rural => (180_000, "-0.5%", 30),
            Neighborhood::Historic => (400_000, "+3.2%", 25),
            Neighborhood::Waterfront => (550_000, "+5.1%", 12),
        };
        MarketSnapshot { avg_price, trend, days_on_market }
    }
}

/// Looks up a neighborhood by its exact, case-sensitive label.
pub fn lookup(name: &str) -> Option<MarketSnapshot> {
    Neighborhood::from_label(name).map(Neighborhood::market)
}
