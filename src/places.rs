use crate::geo::Coord;

/// A named locality used to label grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub long: f64,
}

impl Place {
    const fn new(name: &'static str, lat: f64, long: f64) -> Self {
        Self { name, lat, long }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.lat, self.long)
    }
}

pub const BAKU_ABSHERON: &[Place] = &[
    Place::new("Baku Center", 40.4093, 49.8671),
    Place::new("Sumqayit", 40.5855, 49.6317),
    Place::new("Khirdalan", 40.4486, 49.7553),
    Place::new("Binəqədi", 40.4500, 49.8200),
    Place::new("Sabunçu", 40.4400, 49.9450),
    Place::new("Suraxanı", 40.4300, 50.0100),
    Place::new("Nəsimi", 40.3950, 49.8500),
    Place::new("Yasamal", 40.3850, 49.8050),
    Place::new("Xətai", 40.3700, 49.9000),
    Place::new("Qaradağ", 40.3200, 49.9800),
    Place::new("Pirallahı", 40.4800, 50.1400),
    Place::new("Mərdəkan", 40.4950, 50.1500),
];

pub const REGIONAL_CITIES: &[Place] = &[
    Place::new("Gəncə", 40.6828, 46.3606),
    Place::new("Sumqayıt", 40.5855, 49.6317),
    Place::new("Mingəçevir", 40.7703, 47.0496),
    Place::new("Lənkəran", 38.7536, 48.8511),
    Place::new("Şəki", 41.1919, 47.1706),
    Place::new("Şirvan", 39.9375, 48.9206),
    Place::new("Yevlax", 40.6200, 47.1500),
    Place::new("Xaçmaz", 41.4631, 48.8022),
    Place::new("Şamaxı", 40.6319, 48.6414),
    Place::new("Quba", 41.3611, 48.5128),
    Place::new("Qusar", 41.4275, 48.4303),
    Place::new("Zaqatala", 41.6314, 46.6439),
    Place::new("Qax", 41.4206, 46.9219),
    Place::new("Bərdə", 40.3747, 47.1256),
    Place::new("Ağdam", 39.9914, 46.9928),
    Place::new("Ağdaş", 40.6475, 47.4672),
    Place::new("Göyçay", 40.6533, 47.7406),
    Place::new("Naxçıvan", 39.2089, 45.4122),
    Place::new("Ordubad", 38.9050, 46.0236),
    Place::new("Culfa", 38.9606, 45.6297),
    Place::new("Masallı", 39.0344, 48.6658),
    Place::new("Astara", 38.4561, 48.8750),
    Place::new("Salyan", 39.5936, 48.9836),
    Place::new("Neftçala", 39.3756, 49.2467),
    Place::new("İmişli", 39.8697, 48.0597),
    Place::new("Saatlı", 39.9319, 48.3692),
    Place::new("Sabirabad", 40.0081, 48.4783),
    Place::new("Kürdəmir", 40.3397, 48.1617),
    Place::new("Ucar", 40.5086, 47.6492),
    Place::new("Ağsu", 40.5672, 48.3950),
    Place::new("İsmayıllı", 40.7872, 48.1519),
    Place::new("Qəbələ", 40.9814, 47.8458),
    Place::new("Oğuz", 41.0728, 47.4653),
    Place::new("Balakən", 41.7256, 46.4042),
    Place::new("Tovuz", 40.9925, 45.6286),
    Place::new("Qazax", 41.0922, 45.3656),
    Place::new("Ağstafa", 41.1194, 45.4539),
    Place::new("Samux", 40.7619, 46.4069),
    Place::new("Göygöl", 40.5867, 46.3256),
    Place::new("Daşkəsən", 40.5167, 46.0833),
    Place::new("Gədəbəy", 40.5700, 45.8100),
    Place::new("Şəmkir", 40.8297, 46.0172),
    Place::new("Goranboy", 40.6100, 46.7900),
    Place::new("Tərtər", 40.3439, 46.9328),
    Place::new("Xocalı", 39.9131, 46.7914),
    Place::new("Xocavənd", 39.7900, 47.1100),
    Place::new("Cəbrayıl", 39.3986, 47.0264),
    Place::new("Füzuli", 39.6008, 47.1456),
    Place::new("Zəngilan", 39.0853, 46.6539),
    Place::new("Qubadlı", 39.3450, 46.5800),
    Place::new("Laçın", 39.6378, 46.5461),
    Place::new("Kəlbəcər", 40.1025, 46.0361),
    Place::new("Şuşa", 39.7586, 46.7489),
    Place::new("Xankəndi", 39.8153, 46.7519),
    Place::new("Ağcabədi", 40.0508, 47.4561),
    Place::new("Beyləqan", 39.7742, 47.6183),
    Place::new("Biləsuvar", 39.4597, 48.5494),
    Place::new("Cəlilabad", 39.2081, 48.5017),
    Place::new("Yardımlı", 38.9058, 48.2456),
    Place::new("Lerik", 38.7736, 48.4150),
    Place::new("Siyəzən", 41.0783, 49.1122),
    Place::new("Şabran", 41.2158, 48.9986),
    Place::new("Xızı", 40.9097, 49.0708),
];

/// Cities labelled on regional maps.
pub const MAJOR_REGIONAL_CITIES: &[&str] = &[
    "Gəncə", "Mingəçevir", "Lənkəran", "Şəki", "Şirvan", "Xaçmaz", "Quba", "Naxçıvan", "Zaqatala",
    "Bərdə", "Yevlax", "Şamaxı", "Masallı", "Tovuz", "Qazax", "Şuşa",
];

pub fn major_regional_cities() -> impl Iterator<Item = &'static Place> {
    REGIONAL_CITIES
        .iter()
        .filter(|p| MAJOR_REGIONAL_CITIES.contains(&p.name))
}

/// Closest place to `at`; the first one listed wins a tie.
pub fn nearest_place<'a>(places: &'a [Place], at: &Coord) -> Option<&'a Place> {
    places.iter().fold(None, |best: Option<(&Place, f64)>, place| {
        let d = place.coord().distance_2(at);
        match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((place, d)),
        }
    })
    .map(|(place, _)| place)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_place_picks_the_closest_entry() {
        let place = nearest_place(BAKU_ABSHERON, &Coord::new(40.58, 49.64)).unwrap();
        assert_eq!(place.name, "Sumqayit");
        let place = nearest_place(REGIONAL_CITIES, &Coord::new(40.7, 46.35)).unwrap();
        assert_eq!(place.name, "Gəncə");
        assert!(nearest_place(&[], &Coord::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn every_major_city_is_in_the_gazetteer() {
        assert_eq!(major_regional_cities().count(), MAJOR_REGIONAL_CITIES.len());
    }
}
