use clap::{Arg, ArgAction, Command};
use dutch_conquerors::translation::{ChainProviders, DictionaryProvider, MockProvider};
use dutch_conquerors::{
    BatchTranslator, Language, RelayTrigger, ResolverConfig, TranslationResolver, WordSource,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Resolver whose network tiers always fail; only the local dictionary answers
fn offline_resolver() -> TranslationResolver {
    TranslationResolver::chain(
        ChainProviders {
            primary: Arc::new(MockProvider::failing().named("Mock DeepLX")),
            secondary_default: Arc::new(MockProvider::failing().named("Mock Google (default)")),
            secondary_alt: Arc::new(MockProvider::failing().named("Mock Google (gtx)")),
            relay: Arc::new(MockProvider::failing().named("Mock CORS relay")),
            dictionary: Arc::new(DictionaryProvider::default()),
        },
        RelayTrigger::Never,
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("dutch-conquerors")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate vocabulary words through the Dutch Conquerors fallback chain")
        .arg(
            Arg::new("words")
                .help("Words to translate")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code")
                .default_value("EN"),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .short('t')
                .help("Target language code")
                .default_value("NL"),
        )
        .arg(
            Arg::new("random")
                .long("random")
                .short('r')
                .help("Translate N random words from the bundled word list")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Skip the network tiers; only the local dictionary answers")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the pairs as a JSON array")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Trace every tier attempt")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let source: Language = matches
        .get_one::<String>("source")
        .map(String::as_str)
        .unwrap_or("EN")
        .parse()?;
    let target: Language = matches
        .get_one::<String>("target")
        .map(String::as_str)
        .unwrap_or("NL")
        .parse()?;

    let words: Vec<String> = match matches.get_one::<usize>("random") {
        Some(&count) => WordSource::bundled()?.random_words(count),
        None => matches
            .get_many::<String>("words")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
    };

    if words.is_empty() {
        eprintln!("❌ Nothing to translate: pass words or use --random N");
        return Err("No words given".into());
    }

    let resolver = if matches.get_flag("mock") {
        offline_resolver()
    } else {
        TranslationResolver::from_config(&ResolverConfig::from_env()?)?
    };

    if verbose {
        eprintln!("🌍 {} → {}", source, target);
        eprintln!("🔗 Tiers: {:?}", resolver.stages());
        eprintln!("📝 Words: {}", words.join(", "));
    }

    let batch = BatchTranslator::new(Arc::new(resolver));
    let pairs = batch.translate_all(&words, &source, &target).await;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else {
        for pair in &pairs {
            println!("{} → {}", pair.english, pair.dutch);
        }
    }

    if verbose {
        eprintln!(
            "✅ {} of {} words translated",
            pairs.len(),
            words.len()
        );
    }

    Ok(())
}
