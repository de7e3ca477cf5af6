use serde::Serialize;

/// An ordered sequence of residue masses forming a candidate cyclic peptide.
///
/// The total mass is maintained alongside the sequence so that search code
/// can compare candidates against the parent mass without re-summing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Peptide {
    masses: Vec<u32>,
    monoisotopic: u32,
}

impl Peptide {
    pub fn new(masses: Vec<u32>) -> Self {
        let monoisotopic = masses.iter().sum();
        Self {
            masses,
            monoisotopic,
        }
    }

    pub fn masses(&self) -> &[u32] {
        &self.masses
    }

    pub fn monoisotopic(&self) -> u32 {
        self.monoisotopic
    }

    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

impl std::fmt::Display for Peptide {
    /// Dash-joined masses, e.g. `113-128-71`. The empty peptide renders as
    /// an empty string.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, mass) in self.masses.iter().enumerate() {
            if i > 0 {
                f.write_str("-")?;
            }
            write!(f, "{}", mass)?;
        }
        Ok(())
    }
}
