use crate::configuration::get_configuration;
use crate::models::Document;
use crate::services::readme;

pub struct RegenerateCommand {}

impl RegenerateCommand {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for RegenerateCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::console::commands::CallableTrait for RegenerateCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let settings = get_configuration().expect("Failed to read configuration.");
        let readme_file = settings
            .readme_file
            .ok_or("readme_file is not configured")?;

        let document = Document::load(&settings.data_file)?;
        readme::regenerate(&document, &readme_file)?;
        println!("README updated from {}.", settings.data_file);
        Ok(())
    }
}
