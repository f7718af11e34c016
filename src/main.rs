// =========================================================
// Démonstration — Paillier additif
// Keygen, chiffrement, addition homomorphe, déchiffrement,
// avec persistance des clés et mesures de durée
// =========================================================

// ── Paillier ──────────────────────────────────────────────
use paillier_additive::{p_keygen, p_encrypt, p_decrypt, p_add};

// ── Gestion des clés ──────────────────────────────────────
use paillier_additive::key_management::{
    key_file_exists, ensure_keys_directory,
    save_keypair_json, save_public_key_json, save_secret_key_json,
    load_keypair_json,
};

// ── Types et erreurs ──────────────────────────────────────
use paillier_additive::CryptoError;
use paillier_additive::KeyPair;

// ── Stdlib & crates externes ──────────────────────────────
use num_bigint::{BigUint, RandBigInt};
use rand_core::OsRng;
use std::time::Instant;

// ── Chemins des fichiers de clés ──────────────────────────
const KEYS_DIR:             &str = "keys";
const KEYPAIR_JSON_PATH:    &str = "keys/keypair.json";
const PUBLIC_KEY_JSON_PATH: &str = "keys/public_key.json";
const SECRET_KEY_JSON_PATH: &str = "keys/secret_key.json";

// Taille des premiers pour la démo. 512 bits par premier (n = 1024 bits)
// garde la génération sous quelques secondes ; passer à 1024 pour une
// clé de production (n = 2048 bits).
const DEMO_PRIME_BITS: u64 = 512;

// ─────────────────────────────────────────────────────────
// Erreur applicative centrale
//
// Unifie CryptoError et io::Error pour propager toutes les
// erreurs via ? sans conversion manuelle — plus aucun panic!
// ─────────────────────────────────────────────────────────

#[derive(Debug)]
enum AppError {
    Crypto(CryptoError),
    Io(std::io::Error),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Crypto(e) => write!(f, "Erreur cryptographique : {}", e),
            AppError::Io(e)     => write!(f, "Erreur I/O : {}", e),
        }
    }
}

impl From<CryptoError> for AppError {
    fn from(e: CryptoError) -> Self { AppError::Crypto(e) }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self { AppError::Io(e) }
}

// ─────────────────────────────────────────────────────────
// Clés : chargement si présentes, génération + sauvegarde sinon
// ─────────────────────────────────────────────────────────

fn load_or_generate_keypair() -> Result<KeyPair, AppError> {
    ensure_keys_directory(KEYS_DIR)?;

    if key_file_exists(KEYPAIR_JSON_PATH) {
        println!("Clés existantes trouvées — chargement depuis {}", KEYPAIR_JSON_PATH);
        return Ok(load_keypair_json(KEYPAIR_JSON_PATH)?);
    }

    println!("Génération d'une paire de clés ({} bits par premier)…", DEMO_PRIME_BITS);
    let debut = Instant::now();
    let kp = p_keygen(DEMO_PRIME_BITS)?;
    println!("  keygen : {:?}", debut.elapsed());

    save_keypair_json(&kp, KEYPAIR_JSON_PATH)?;
    save_public_key_json(&kp.public_key, PUBLIC_KEY_JSON_PATH)?;
    save_secret_key_json(&kp.secret_key, SECRET_KEY_JSON_PATH)?;
    println!("  clés sauvegardées sous {}/", KEYS_DIR);

    Ok(kp)
}

// ─────────────────────────────────────────────────────────
// Scénario : Enc(7) ⊕ Enc(35) → Dec = 42, puis un clair aléatoire
// ─────────────────────────────────────────────────────────

fn run() -> Result<(), AppError> {
    let kp = load_or_generate_keypair()?;
    let pk = &kp.public_key;
    let sk = &kp.secret_key;

    println!("\nn : {} bits", pk.n.bits());

    let m1 = BigUint::from(7u32);
    let m2 = BigUint::from(35u32);

    let debut = Instant::now();
    let c1 = p_encrypt(&m1, pk)?;
    let c2 = p_encrypt(&m2, pk)?;
    println!("chiffrement (x2)     : {:?}", debut.elapsed());

    let debut = Instant::now();
    let c3 = p_add(&c1, &c2, pk)?;
    println!("addition homomorphe  : {:?}", debut.elapsed());

    let debut = Instant::now();
    let somme = p_decrypt(&c3, pk, sk)?;
    println!("déchiffrement        : {:?}", debut.elapsed());

    println!(
        "Dec(Enc(7) ⊕ Enc(35)) = {} — {}",
        somme,
        if somme == BigUint::from(42u32) { "OK" } else { "ÉCHEC" }
    );

    // Aller-retour sur un clair aléatoire dans [0, n)
    let mut rng = OsRng;
    let m = rng.gen_biguint_below(&pk.n);
    let c = p_encrypt(&m, pk)?;
    let retrouve = p_decrypt(&c, pk, sk)?;
    println!(
        "aller-retour aléatoire : {}",
        if retrouve == m { "OK" } else { "ÉCHEC" }
    );

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
