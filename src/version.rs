// Python release version to semver conversion

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PYTHON_RELEASE: Regex =
        Regex::new(r"(\d+\.\d+\.\d+)((a|b|rc)(\d+))?(\.post\d+)?(\.dev\d+)?$")
            .expect("release pattern is valid");
}

/// Convert a Python version to a semver string.
///
/// Pre-releases `aN`, `bN` and `rcN` become `-alpha.N`, `-beta.N` and
/// `-rc.N`; `.postN` and `.devN` suffixes are dropped. Versions without a
/// `X.Y.Z` core are returned unchanged.
pub fn to_semver(version: &str) -> String {
    PYTHON_RELEASE
        .replace(version, |caps: &Captures| {
            let release = &caps[1];
            match (caps.get(3), caps.get(4)) {
                (Some(kind), Some(number)) => {
                    let label = match kind.as_str() {
                        "a" => "alpha",
                        "b" => "beta",
                        _ => "rc",
                    };
                    format!("{}-{}.{}", release, label, number.as_str())
                }
                _ => release.to_string(),
            }
        })
        .into_owned()
}
