use crate::generation::rng::WorldRng;
use crate::model::Gender;

pub const CITY_NAMES: &[&str] = &[
    "Tokyo", "Shanghai", "New York", "Berlin", "London", "Paris", "Moscow", "Sydney", "Seoul",
    "Mumbai", "Cairo", "Rio", "Lagos", "Singapore", "Dubai", "Bangkok",
];

pub const CITY_PREFIXES: &[&str] = &[
    "Neo-", "Cyber-", "Mega-", "Tech-", "Digi-", "Synth-", "Quantum-", "Hyper-",
];

const MALE_FORENAMES: &[&str] = &[
    "Adam", "Alex", "Benjamin", "Chen", "David", "Ethan", "Felix", "Gabriel", "Hiro", "Ian",
    "Jack", "Kenji", "Liam", "Miguel", "Noah", "Omar", "Paul", "Quentin", "Ryan", "Sanjay",
    "Thomas", "Umar", "Victor", "Wei", "Xavier", "Yuri", "Zack",
];

const FEMALE_FORENAMES: &[&str] = &[
    "Alice", "Bianca", "Claire", "Diana", "Emma", "Fiona", "Grace", "Hannah", "Iris", "Julia",
    "Kate", "Lily", "Maria", "Nina", "Olivia", "Penny", "Quinn", "Rose", "Sophia", "Tara", "Uma",
    "Victoria", "Wendy", "Xena", "Yasmine", "Zoe",
];

const SURNAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Jones", "Brown", "Davis", "Miller", "Wilson", "Moore",
    "Taylor", "Anderson", "Thomas", "Jackson", "White", "Harris", "Martin", "Thompson", "Garcia",
    "Martinez", "Robinson", "Clark", "Rodriguez", "Lewis", "Lee", "Walker", "Hall", "Allen",
    "Young", "Hernandez", "King", "Wright", "Lopez", "Hill", "Scott", "Green", "Adams", "Baker",
    "Gonzalez", "Nelson", "Carter", "Mitchell", "Perez", "Roberts", "Turner", "Phillips",
    "Campbell", "Parker", "Evans", "Edwards", "Collins",
];

const SYNTHETIC_NAME_LEN: usize = 5;

/// Catalogue that hands out each name once, then falls back to synthetic
/// names.
#[derive(Debug, Clone)]
pub struct NamePool {
    remaining: Vec<&'static str>,
}

impl NamePool {
    pub fn new(names: &[&'static str]) -> Self {
        Self {
            remaining: names.to_vec(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn draw(&mut self, rng: &mut WorldRng) -> String {
        self.draw_or_else(rng, |rng| synthetic_name(rng, SYNTHETIC_NAME_LEN))
    }

    /// Like `draw`, with a caller-supplied fallback once the pool is empty.
    pub fn draw_or_else(
        &mut self,
        rng: &mut WorldRng,
        fallback: impl FnOnce(&mut WorldRng) -> String,
    ) -> String {
        if self.remaining.is_empty() {
            return fallback(rng);
        }
        let index = rng.range(0..self.remaining.len());
        self.remaining.remove(index).to_string()
    }
}

pub fn synthetic_name(rng: &mut WorldRng, len: usize) -> String {
    (0..len).map(|_| rng.range(b'A'..=b'Z') as char).collect()
}

pub fn random_forename(rng: &mut WorldRng, gender: Gender) -> &'static str {
    match gender {
        Gender::Male => *rng.pick(MALE_FORENAMES),
        Gender::Female => *rng.pick(FEMALE_FORENAMES),
    }
}

pub fn random_surname(rng: &mut WorldRng) -> &'static str {
    *rng.pick(SURNAMES)
}

pub fn random_full_name(rng: &mut WorldRng, gender: Gender) -> String {
    let first = random_forename(rng, gender);
    let last = random_surname(rng);
    format!("{} {}", first, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_hands_out_unique_names_then_synthetic() {
        let mut rng = WorldRng::new(Some(17));
        let mut pool = NamePool::new(&["Tokyo", "Berlin"]);
        let mut first_two = vec![pool.draw(&mut rng), pool.draw(&mut rng)];
        first_two.sort();
        assert_eq!(first_two, vec!["Berlin", "Tokyo"]);
        assert!(pool.is_exhausted());

        let synthetic = pool.draw(&mut rng);
        assert_eq!(synthetic.len(), SYNTHETIC_NAME_LEN);
        assert!(synthetic.chars().all(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn full_name_uses_gendered_forenames() {
        let mut rng = WorldRng::new(Some(2));
        for _ in 0..20 {
            let name = random_full_name(&mut rng, Gender::Female);
            let first = name.split(' ').next().unwrap();
            assert!(FEMALE_FORENAMES.contains(&first));
        }
    }

    #[test]
    fn full_name_ends_with_a_catalogue_surname() {
        let mut rng = WorldRng::new(Some(6));
        for _ in 0..20 {
            let name = random_full_name(&mut rng, Gender::Male);
            let (first, last) = name.split_once(' ').unwrap();
            assert!(MALE_FORENAMES.contains(&first));
            assert!(SURNAMES.contains(&last));
        }
    }
}
