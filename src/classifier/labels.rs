// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Ordered label table for the classifier's output layer

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

/// Output order of the ASL alphabet model: index i of the score vector is `ASL_LABELS[i]`
pub const ASL_LABELS: [&str; 29] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z", "del", "nothing", "space",
];

/// Ordered, immutable sequence of class labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    labels: Arc<[String]>,
}

impl LabelTable {
    /// The built-in 29-symbol ASL table
    pub fn asl() -> Self {
        Self {
            labels: ASL_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Build a table from labels in output-index order
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        for label in &labels {
            if label.is_empty() {
                anyhow::bail!("Label table contains an empty label");
            }
            if !seen.insert(label.as_str()) {
                anyhow::bail!("Label table contains duplicate label '{}'", label);
            }
        }

        Ok(Self {
            labels: labels.into(),
        })
    }

    /// Load labels from a text file, one label per line
    ///
    /// Blank lines are skipped; surrounding whitespace is trimmed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open label file: {}", path.display()))?;

        let mut labels = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.context("Failed to read label line")?;
            let label = line.trim();
            if !label.is_empty() {
                labels.push(label.to_string());
            }
        }

        Self::new(labels).with_context(|| format!("Invalid label file: {}", path.display()))
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl Default for LabelTable {
    fn default() -> Self {
        Self::asl()
    }
}
