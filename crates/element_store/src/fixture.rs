//! Built-in dataset served by the mock provider.

use shared::domain::PeriodicElement;

const ELEMENT_ROWS: [(&str, f64, &str); 20] = [
    ("Hydrogen", 1.0079, "H"),
    ("Helium", 4.0026, "He"),
    ("Lithium", 6.941, "Li"),
    ("Beryllium", 9.0122, "Be"),
    ("Boron", 10.811, "B"),
    ("Carbon", 12.0107, "C"),
    ("Nitrogen", 14.0067, "N"),
    ("Oxygen", 15.9994, "O"),
    ("Fluorine", 18.9984, "F"),
    ("Neon", 20.1797, "Ne"),
    ("Sodium", 22.9897, "Na"),
    ("Magnesium", 24.305, "Mg"),
    ("Aluminum", 26.9815, "Al"),
    ("Silicon", 28.0855, "Si"),
    ("Phosphorus", 30.9738, "P"),
    ("Sulfur", 32.065, "S"),
    ("Chlorine", 35.453, "Cl"),
    ("Argon", 39.948, "Ar"),
    ("Potassium", 39.0983, "K"),
    ("Calcium", 40.078, "Ca"),
];

/// The first twenty elements; `id` and `position` both follow atomic number.
pub fn default_elements() -> Vec<PeriodicElement> {
    ELEMENT_ROWS
        .iter()
        .zip(1..)
        .map(|(&(name, weight, symbol), number)| {
            PeriodicElement::new(number, name, number, weight, symbol)
        })
        .collect()
}
