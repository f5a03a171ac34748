use crate::domain::entities::price::{PricePair, PriceTable, UNSELECTED_REGION};

/// Prices shipped with the panel, used when the remote table cannot be read.
const BUNDLED_PRICES: &[(&str, u64, u64)] = &[
    (UNSELECTED_REGION, 0, 0),
    ("Adrar", 1400, 900),
    ("Chlef", 700, 400),
    ("Laghouat", 900, 600),
    ("Oum El Bouaghi", 750, 450),
    ("Batna", 750, 450),
    ("Béjaïa", 700, 400),
    ("Biskra", 850, 500),
    ("Béchar", 1100, 700),
    ("Blida", 500, 300),
    ("Bouira", 650, 400),
    ("Tamanrasset", 1600, 1100),
    ("Tébessa", 800, 500),
    ("Tlemcen", 750, 450),
    ("Tiaret", 750, 450),
    ("Tizi Ouzou", 650, 400),
    ("Alger", 400, 250),
    ("Djelfa", 850, 500),
    ("Jijel", 750, 450),
    ("Sétif", 700, 400),
    ("Saïda", 800, 500),
    ("Skikda", 750, 450),
    ("Sidi Bel Abbès", 750, 450),
    ("Annaba", 750, 450),
    ("Guelma", 750, 450),
    ("Constantine", 700, 400),
    ("Médéa", 650, 400),
    ("Mostaganem", 700, 400),
    ("M'Sila", 800, 500),
    ("Mascara", 750, 450),
    ("Ouargla", 1000, 650),
    ("Oran", 650, 400),
    ("El Bayadh", 1000, 650),
    ("Illizi", 1800, 1200),
    ("Bordj Bou Arréridj", 700, 400),
    ("Boumerdès", 500, 300),
    ("El Tarf", 800, 500),
    ("Tindouf", 1800, 1200),
    ("Tissemsilt", 800, 500),
    ("El Oued", 1000, 650),
    ("Khenchela", 800, 500),
    ("Souk Ahras", 800, 500),
    ("Tipaza", 500, 300),
    ("Mila", 750, 450),
    ("Aïn Defla", 650, 400),
    ("Naâma", 1000, 650),
    ("Aïn Témouchent", 750, 450),
    ("Ghardaïa", 950, 600),
    ("Relizane", 750, 450),
    ("Timimoun", 1400, 900),
    ("Bordj Badji Mokhtar", 1800, 1200),
    ("Ouled Djellal", 900, 600),
    ("Béni Abbès", 1300, 850),
    ("In Salah", 1600, 1100),
    ("In Guezzam", 1800, 1200),
    ("Touggourt", 1000, 650),
    ("Djanet", 1800, 1200),
    ("El M'Ghair", 1000, 650),
    ("El Meniaa", 1200, 800),
];

pub fn bundled_default_table() -> PriceTable {
    BUNDLED_PRICES
        .iter()
        .map(|(region, home, desk)| (region.to_string(), PricePair::new(*home, *desk)))
        .collect()
}
