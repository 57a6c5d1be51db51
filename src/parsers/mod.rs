pub mod casait;
pub mod idealista;
pub mod immobiliare;
pub mod text;
pub mod traits;

pub use casait::CasaItParser;
pub use idealista::IdealistaParser;
pub use immobiliare::ImmobiliareParser;
pub use traits::EmailParser;

/// All portal parsers, in the order they run over each email
pub fn all() -> Vec<Box<dyn EmailParser>> {
    vec![
        Box::new(CasaItParser::new()),
        Box::new(ImmobiliareParser::new()),
        Box::new(IdealistaParser::new()),
    ]
}
