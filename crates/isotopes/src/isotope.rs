use nucdiff_utils::{f, StringExt};
use serde::{Deserialize, Serialize};

/// Reference isotope data
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReferenceIsotope {
    /// Number of protons, Z
    pub proton_number: i32,
    /// Number of neutrons, N = A - Z
    pub neutron_number: i32,
    /// Element symbol e.g. 'He', 'Co'
    pub name: String,
    /// Reference abundance as given in the table
    pub abundance: f64,
}

impl ReferenceIsotope {
    /// Atomic mass number, A = Z + N
    pub fn mass_number(&self) -> i32 {
        self.proton_number + self.neutron_number
    }

    /// Simple formatted string to identify the isotope, e.g. `He4`
    pub fn label(&self) -> String {
        f!("{}{}", self.name.capitalise(), self.mass_number())
    }

    /// Grid cell `(z, n)` of the isotope, if both are non-negative
    pub fn cell(&self) -> Option<(usize, usize)> {
        Some((
            usize::try_from(self.proton_number).ok()?,
            usize::try_from(self.neutron_number).ok()?,
        ))
    }
}

/// Find the isotope at a given grid cell
pub fn find_isotope(isotopes: &[ReferenceIsotope], z: usize, n: usize) -> Option<&ReferenceIsotope> {
    isotopes.iter().find(|i| i.cell() == Some((z, n)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helium() -> ReferenceIsotope {
        ReferenceIsotope {
            proton_number: 2,
            neutron_number: 2,
            name: "He".into(),
            abundance: 0.25,
        }
    }

    #[test]
    fn label() {
        assert_eq!(helium().label(), "He4");
        assert_eq!(helium().mass_number(), 4);
    }

    #[test]
    fn lookup_by_cell() {
        let isotopes = vec![helium()];
        assert!(find_isotope(&isotopes, 2, 2).is_some());
        assert!(find_isotope(&isotopes, 2, 1).is_none());
    }

    #[test]
    fn negative_neutrons_have_no_cell() {
        let mut isotope = helium();
        isotope.neutron_number = -1;
        assert_eq!(isotope.cell(), None);
    }
}
