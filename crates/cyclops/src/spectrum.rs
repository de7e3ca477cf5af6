use fnv::FnvHashMap;

use crate::fragment::{FragmentSeries, Kind};
use crate::peptide::Peptide;

/// A multiset of fragment masses, stored as mass -> multiplicity.
///
/// Experimental spectra are built once from the raw input masses and never
/// modified afterwards; theoretical spectra are derived per peptide.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Spectrum {
    counts: FnvHashMap<u32, u32>,
}

impl Spectrum {
    pub fn from_masses(masses: impl IntoIterator<Item = u32>) -> Self {
        let mut counts = FnvHashMap::default();
        for mass in masses {
            *counts.entry(mass).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Multiplicity of `mass`, zero when absent
    pub fn multiplicity(&self, mass: u32) -> u32 {
        self.counts.get(&mass).copied().unwrap_or(0)
    }

    /// The largest mass present. For an experimental spectrum this is the
    /// parent mass: the target total mass of a complete candidate.
    pub fn parent_mass(&self) -> Option<u32> {
        self.counts.keys().copied().max()
    }

    /// Total number of peaks, counting multiplicity
    pub fn peak_count(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.counts.iter().map(|(&mass, &count)| (mass, count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<u32> for Spectrum {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self::from_masses(iter)
    }
}

/// Theoretical spectrum of the peptide read as a line
pub fn linear_spectrum(peptide: &Peptide) -> Spectrum {
    FragmentSeries::new(peptide, Kind::Linear).collect()
}

/// Theoretical spectrum of the peptide read as a closed ring
pub fn cyclic_spectrum(peptide: &Peptide) -> Spectrum {
    FragmentSeries::new(peptide, Kind::Cyclic).collect()
}
