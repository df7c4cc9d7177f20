use std::path::PathBuf;

pub struct RunArgs {
    pub software: PathBuf,
    pub hardware: PathBuf,
}

pub struct ReadArgs {
    pub hardware: PathBuf,
    pub names: Vec<String>,
}
