// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use clap::Parser;

use crate::formatter::ColumnOpts;

#[derive(Parser, Debug)]
#[command(name = "sls", version, about = "List Strava activities")]
pub struct Cli {
    /// Show all columns
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Show work (kJ) and average power (W)
    #[arg(short = 'p', long)]
    pub power: bool,

    /// Show moving time
    #[arg(short = 't', long)]
    pub time: bool,

    /// Ignore cached data and fetch everything
    #[arg(short = 'r', long)]
    pub refresh: bool,

    /// Print activities as JSON instead of a table
    #[arg(short = 'j', long)]
    pub json: bool,
}

impl Cli {
    pub fn column_opts(&self) -> ColumnOpts {
        ColumnOpts {
            power: self.power,
            time: self.time,
            all: self.all,
        }
    }
}
