use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Benchmark dataset a run is nominally evaluated against.
///
/// The catalog is fixed; the dataset is forwarded to the generator prompt and
/// the report, it does not change the derivation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    #[serde(rename = "MNIST")]
    Mnist,
    #[serde(rename = "Fashion-MNIST")]
    FashionMnist,
    #[serde(rename = "CIFAR-10")]
    Cifar10,
    #[serde(rename = "CIFAR-100")]
    Cifar100,
}

impl Dataset {
    pub const ALL: [Dataset; 4] = [
        Dataset::Mnist,
        Dataset::FashionMnist,
        Dataset::Cifar10,
        Dataset::Cifar100,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Mnist => "MNIST",
            Dataset::FashionMnist => "Fashion-MNIST",
            Dataset::Cifar10 => "CIFAR-10",
            Dataset::Cifar100 => "CIFAR-100",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::ALL
            .iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown dataset: {}", s))
    }
}

/// Network architecture the candidate functions are nominally plugged into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelArch {
    #[serde(rename = "Simple CNN")]
    SimpleCnn,
    #[serde(rename = "ResNet-18")]
    ResNet18,
}

impl ModelArch {
    pub const ALL: [ModelArch; 2] = [ModelArch::SimpleCnn, ModelArch::ResNet18];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelArch::SimpleCnn => "Simple CNN",
            ModelArch::ResNet18 => "ResNet-18",
        }
    }
}

impl fmt::Display for ModelArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelArch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelArch::ALL
            .iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown model architecture: {}", s))
    }
}
