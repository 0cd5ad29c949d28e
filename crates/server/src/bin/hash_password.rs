//! Hash a password for inserting an account by hand.
//!
//! Usage: `hash-password <password>`

fn main() {
    let Some(password) = std::env::args().nth(1) else {
        eprintln!("usage: hash-password <password>");
        std::process::exit(2);
    };
    if password.len() < 8 {
        eprintln!("Password must be at least 8 characters");
        std::process::exit(2);
    }

    match server::auth::password::hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => {
            eprintln!("Failed to hash password: {}", e.message);
            std::process::exit(1);
        }
    }
}
