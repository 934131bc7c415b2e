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

//! Service configuration, read from `REALVALUE_*` environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

use crate::session::TrainingConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue { var: &'static str, value: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub address: SocketAddr,
    pub frontend_dir: PathBuf,
    pub cors_enabled: bool,
    pub training: TrainingConfig,
    /// Where to write the fitted preprocessor after training, if anywhere.
    pub preprocessor_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            frontend_dir: PathBuf::from("frontend"),
            cors_enabled: true,
            training: TrainingConfig::default(),
            preprocessor_path: None,
        }
    }
}

impl Config {
    pub fn with_address(mut self, address: SocketAddr) -> Self {
        self.address = address;
        self
    }

    pub fn with_frontend_dir(mut self, dir: PathBuf) -> Self {
        self.frontend_dir = dir;
        self
    }

    pub fn without_cors(mut self) -> Self {
        self.cors_enabled = false;
        self
    }

    pub fn with_training(mut self, training: TrainingConfig) -> Self {
        self.training = training;
        self
    }

    pub fn with_preprocessor_path(mut self, path: PathBuf) -> Self {
        self.preprocessor_path = Some(path);
        self
    }

    /// Defaults overridden by whichever `REALVALUE_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup("REALVALUE_ADDR") {
            config.address = parse("REALVALUE_ADDR", value)?;
        }
        if let Some(value) = lookup("REALVALUE_FRONTEND_DIR") {
            config.frontend_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("REALVALUE_CORS") {
            config.cors_enabled = parse_bool("REALVALUE_CORS", value)?;
        }
        if let Some(value) = lookup("REALVALUE_SAMPLES") {
            config.training.n_samples = parse("REALVALUE_SAMPLES", value)?;
        }
        if let Some(value) = lookup("REALVALUE_SEED") {
            config.training.seed = parse("REALVALUE_SEED", value)?;
        }
        if let Some(value) = lookup("REALVALUE_PREPROCESSOR_PATH") {
            config.preprocessor_path = Some(PathBuf::from(value));
        }

        Ok(config)
    }
}

fn parse<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
        value,
    })
}

fn parse_bool(var: &'static str, value: String) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value,
            reason: "expected a boolean".to_string(),
        }),
    }
}
