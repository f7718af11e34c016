// Réexporte toutes les structures et fonctions mathématiques

mod math;

pub use math::{
    l_function, gcd, lcm, generate_prime, is_probably_prime, mod_inverse,
    DEFAULT_MR_ROUNDS, MIN_PRIME_BITS,
};
