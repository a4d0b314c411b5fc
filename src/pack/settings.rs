//! Channel pack settings

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A color channel of an image
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Channel {
    R,
    G,
    B,
    A,
}

impl Channel {
    pub const ALL: [Self; 4] = [Self::R, Self::G, Self::B, Self::A];

    /// Index into an RGBA pixel
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::R => 0,
            Self::G => 1,
            Self::B => 2,
            Self::A => 3,
        }
    }

    /// Value an output channel takes when it has no source
    #[must_use]
    pub const fn fill_value(self) -> f32 {
        match self {
            Self::A => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::R => "R",
            Self::G => "G",
            Self::B => "B",
            Self::A => "A",
        };
        f.write_str(s)
    }
}

/// Where one output channel takes its values from
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChannelSource {
    /// Suffix tokens; the first bundle member ending with any of them is used
    pub sources: Vec<String>,
    /// Channel read from the source image
    pub channel: Channel,
    pub invert: bool,
}

impl ChannelSource {
    #[must_use]
    pub fn new(channel: Channel) -> Self {
        Self {
            sources: Vec::new(),
            channel,
            invert: false,
        }
    }

    /// Parse a "BaseColor, Normal" style list (commas or whitespace)
    #[must_use]
    pub fn parse_sources(list: &str) -> Vec<String> {
        list.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    /// Append a token unless it is already listed
    pub fn add_source(&mut self, token: &str) {
        if !token.is_empty() && !self.sources.iter().any(|s| s == token) {
            self.sources.push(token.to_string());
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Everything the packer needs besides the bundles
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PackSettings {
    pub r: ChannelSource,
    pub g: ChannelSource,
    pub b: ChannelSource,
    pub a: ChannelSource,
    /// Appended to the bundle name to form the packed image name
    pub packed_suffix: String,
    /// Replace packed images that already exist
    pub overwrite: bool,
    /// Location template the packed images are written to
    pub output_path: String,
    /// Add newly packed images to their bundle
    pub add_to_bundle: bool,
}

impl Default for PackSettings {
    fn default() -> Self {
        Self {
            r: ChannelSource::new(Channel::R),
            g: ChannelSource::new(Channel::G),
            b: ChannelSource::new(Channel::B),
            a: ChannelSource::new(Channel::A),
            packed_suffix: "_Packed".to_string(),
            overwrite: false,
            output_path: "//packed/".to_string(),
            add_to_bundle: true,
        }
    }
}

impl PackSettings {
    /// Source settings for an output channel
    #[must_use]
    pub const fn source(&self, output: Channel) -> &ChannelSource {
        match output {
            Channel::R => &self.r,
            Channel::G => &self.g,
            Channel::B => &self.b,
            Channel::A => &self.a,
        }
    }

    pub fn source_mut(&mut self, output: Channel) -> &mut ChannelSource {
        match output {
            Channel::R => &mut self.r,
            Channel::G => &mut self.g,
            Channel::B => &mut self.b,
            Channel::A => &mut self.a,
        }
    }
}
