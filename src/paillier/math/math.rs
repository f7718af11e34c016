use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use num_integer::Integer;
use rand_core::OsRng;
use rand_core::RngCore;
use crate::crypto_error::crypto_error::CryptoError;

// Taille minimale d'un premier accepté (le placement des bits hauts/bas
// exige quelques bits de marge, et en-dessous la factorisation est triviale)
pub const MIN_PRIME_BITS: u64 = 16;

// Nombre de rounds Miller-Rabin par défaut.
// Probabilité de faux positif <= 4^-5 par candidat composite.
pub const DEFAULT_MR_ROUNDS: u32 = 5;

// ---------------------------------------------------------------------------
// Table de petits premiers impairs (division d'essai préliminaire).
// Couvre jusqu'à 997 : la division d'essai est donc EXACTE pour tout
// entier < 997², ce qui rend is_probably_prime déterministe sous 10 000.
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
    359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739,
    743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,
];

// ---------------------------------------------------------------------------
// Fonction L(u) = (u-1)/n — étape d'extraction du déchiffrement.
//
// La division doit être EXACTE : pour un chiffré valide sous la clé,
// u = c^lambda mod n² est congru à 1 mod n, donc n divise u-1.
// Un reste non nul (ou u = 0, cas c non inversible mod n²) signale un
// chiffré malformé → Err(InvalidCiphertext), jamais de troncature silencieuse.
// ---------------------------------------------------------------------------
pub fn l_function(u: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    if u.is_zero() {
        return Err(CryptoError::InvalidCiphertext);
    }
    let u_minus_1 = u - BigUint::one();
    let (quotient, reste) = u_minus_1.div_rem(n);
    if !reste.is_zero() {
        return Err(CryptoError::InvalidCiphertext);
    }
    Ok(quotient)
}

// Calcule le pgcd de deux nombres
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    (a * b) / gcd(a, b)
}

// ---------------------------------------------------------------------------
// Génération d'un premier probable de exactement `nbits` bits.
//
// Chaque essai : tirage OsRng, bit haut forcé (garantit nbits bits),
// bit bas forcé (rejet des pairs avant tout test), division d'essai
// par la table, puis Miller-Rabin à `rounds` témoins aléatoires.
//
// Budget d'essais borné : la densité des premiers de nbits bits est
// ~ 2/(nbits·ln 2), donc 128·nbits essais couvrent très largement le cas
// nominal. Si le budget est épuisé (entropie défaillante, nbits aberrant),
// on remonte Err(PrimalityTestExhausted) plutôt que de boucler sans fin.
// ---------------------------------------------------------------------------
pub fn generate_prime(nbits: u64, rounds: u32) -> Result<BigUint, CryptoError> {
    if nbits < MIN_PRIME_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: nbits,
            minimum: MIN_PRIME_BITS,
        });
    }

    let mut rng = OsRng;
    let budget = 128 * nbits;

    for _ in 0..budget {
        let mut candidate = rng.gen_biguint(nbits);
        candidate.set_bit(nbits - 1, true); // MSB : exactement nbits bits
        candidate.set_bit(0, true);         // impair : filtre pair gratuit

        if is_probably_prime(&candidate, rounds, &mut rng) {
            debug_assert_eq!(candidate.bits(), nbits);
            return Ok(candidate);
        }
    }

    Err(CryptoError::PrimalityTestExhausted { attempts: budget })
}

// Vérifie si n est divisible par un des petits premiers de la table
// (n égal au petit premier lui-même n'est pas un rejet).
fn is_divisible_by_small_prime(n: &BigUint) -> bool {
    for &p in SMALL_PRIMES {
        let bp = BigUint::from(p);
        if n == &bp {
            return false;
        }
        if (n % &bp).is_zero() {
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// Test de primalité Miller-Rabin à témoins aléatoires.
//
// Cas triviaux, puis division d'essai (exacte sous 997²), puis :
// n-1 = d·2^s avec d impair ; pour chaque témoin a ∈ [2, n-2],
// x = a^d mod n passe si x ∈ {1, n-1} ou si un des s-1 carrés successifs
// atteint n-1. Un témoin qui échoue prouve la compositité → false immédiat.
// ---------------------------------------------------------------------------
pub fn is_probably_prime(n: &BigUint, rounds: u32, rng: &mut impl RngCore) -> bool {
    if n <= &BigUint::one() { return false; }
    if n == &BigUint::from(2u32) || n == &BigUint::from(3u32) { return true; }
    if n.is_even() { return false; }
    if is_divisible_by_small_prime(n) { return false; }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(
            &BigUint::from(2u32),
            &(n - BigUint::from(2u32)),
        );
        let mut x = a.modpow(&d, n);
        if x == BigUint::one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..s.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod n.
// Retourne Err(CryptoError::NoModularInverse) si gcd(a,n) != 1.
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, n: &BigUint) -> Result<BigUint, CryptoError> {
    use num_bigint::BigInt;

    let (g, x, _) = extended_gcd(a, n);
    if g != BigUint::one() {
        return Err(CryptoError::NoModularInverse);
    }

    let n_big = BigInt::from(n.clone());
    let mut x_mod = x % &n_big;
    if x_mod < BigInt::zero() {
        x_mod += &n_big;
    }

    x_mod.to_biguint().ok_or(CryptoError::NegativeConversion)
}

// Euclide étendu sur BigInt (les coefficients de Bézout sont signés)
fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, num_bigint::BigInt, num_bigint::BigInt) {
    use num_bigint::BigInt;

    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while r != BigInt::zero() {
        let quotient = &old_r / &r;

        let temp_r = r.clone();
        r = old_r - &quotient * &r;
        old_r = temp_r;

        let temp_s = s.clone();
        s = old_s - &quotient * &s;
        old_s = temp_s;

        let temp_t = t.clone();
        t = old_t - &quotient * &t;
        old_t = temp_t;
    }

    let gcd_val = old_r.to_biguint().unwrap_or_default();

    (gcd_val, old_s, old_t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    // Crible d'Ératosthène — référence exacte pour le test de primalité
    fn sieve_below(limit: usize) -> Vec<bool> {
        let mut is_prime = vec![true; limit];
        is_prime[0] = false;
        is_prime[1] = false;
        let mut i = 2;
        while i * i < limit {
            if is_prime[i] {
                let mut j = i * i;
                while j < limit {
                    is_prime[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        is_prime
    }

    #[test]
    fn test_primalite_exhaustive_sous_10000() {
        let mut rng = OsRng;
        let reference = sieve_below(10_000);
        for n in 0usize..10_000 {
            let got = is_probably_prime(&BigUint::from(n), DEFAULT_MR_ROUNDS, &mut rng);
            assert_eq!(got, reference[n], "désaccord sur n = {}", n);
        }
    }

    #[test]
    fn test_generate_prime_taille_et_imparite() {
        let p = generate_prime(24, DEFAULT_MR_ROUNDS).unwrap();
        assert_eq!(p.bits(), 24);
        assert!(p.is_odd());
        assert!(is_probably_prime(&p, 20, &mut OsRng));
    }

    #[test]
    fn test_generate_prime_taille_trop_petite() {
        assert_eq!(
            generate_prime(8, DEFAULT_MR_ROUNDS),
            Err(CryptoError::KeySizeTooSmall { requested: 8, minimum: MIN_PRIME_BITS })
        );
    }

    #[test]
    fn test_l_function_division_exacte() {
        // u = 1 + 3·7 → L(u) = 3 pour n = 7
        let u = BigUint::from(22u32);
        let n = BigUint::from(7u32);
        assert_eq!(l_function(&u, &n).unwrap(), BigUint::from(3u32));
    }

    #[test]
    fn test_l_function_reste_non_nul() {
        // u - 1 = 22 non divisible par 7 → chiffré malformé
        let u = BigUint::from(23u32);
        let n = BigUint::from(7u32);
        assert_eq!(l_function(&u, &n), Err(CryptoError::InvalidCiphertext));
    }

    #[test]
    fn test_l_function_u_nul() {
        assert_eq!(
            l_function(&BigUint::zero(), &BigUint::from(7u32)),
            Err(CryptoError::InvalidCiphertext)
        );
    }

    #[test]
    fn test_mod_inverse_connu() {
        // 3·4 = 12 ≡ 1 (mod 11)
        let inv = mod_inverse(&BigUint::from(3u32), &BigUint::from(11u32)).unwrap();
        assert_eq!(inv, BigUint::from(4u32));
    }

    #[test]
    fn test_mod_inverse_inexistant() {
        // gcd(6, 9) = 3 ≠ 1
        assert_eq!(
            mod_inverse(&BigUint::from(6u32), &BigUint::from(9u32)),
            Err(CryptoError::NoModularInverse)
        );
    }

    #[test]
    fn test_lcm() {
        assert_eq!(
            lcm(&BigUint::from(16u32), &BigUint::from(18u32)),
            BigUint::from(144u32)
        );
    }
}
