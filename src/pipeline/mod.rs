pub mod extraction;
pub mod claim; // Claim fields from EOB text
pub mod summary; // Records summary via hosted or local model
pub mod letter;
pub mod render; // Letter blocks, Word and PDF output
pub mod processor; // Run orchestrator
