use crate::helpers::base_path;

pub fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        println!("Loaded local .env")
    }
    // Also load .env next to the configuration files if it exists
    let root_dotenv = base_path::ROOT_DIR.join(".env");
    if dotenv::from_path(&root_dotenv).is_ok() {
        println!("Loaded {}", root_dotenv.display());
    }
}
