mod error;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use policy::{
    Ability, AbilityCache, ActionName, Decision, Document, EngineConfig, Principal, Role, Subject,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use error::{Error, Result};

const CONFIG_FILE: &str = "warden.toml";

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Inspect role-derived permissions", long_about = None)]
#[command(version)]
struct Cli {
    /// Engine config file (defaults to ./warden.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log resolution and cache activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug, Clone)]
struct PrincipalArgs {
    /// Principal id
    #[arg(long)]
    id: String,

    /// Principal role (user, admin)
    #[arg(long, default_value = "user")]
    role: String,
}

#[derive(clap::Args, Debug, Clone)]
struct TargetArgs {
    /// Action (create, access, update, delete, manage)
    #[arg(short, long)]
    action: ActionName,

    /// Subject type, e.g. Resource
    #[arg(short, long)]
    subject: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the rules resolved for a principal
    Rules {
        #[command(flatten)]
        principal: PrincipalArgs,
    },
    /// Check a single permission
    Check {
        #[command(flatten)]
        principal: PrincipalArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// Object fields as JSON; omit for a type-level check
        #[arg(short, long)]
        object: Option<String>,
    },
    /// Print the storage filter for an action on a subject type
    Filter {
        #[command(flatten)]
        principal: PrincipalArgs,
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Print the documents from a JSON array file that the filter selects
    Select {
        #[command(flatten)]
        principal: PrincipalArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// File holding a JSON array of documents
        #[arg(short, long)]
        documents: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(cli.config.as_deref())?;
    let cache = AbilityCache::new(&config.cache);

    match cli.command {
        Commands::Rules { principal } => {
            let ability = resolve(&cache, &principal)?;
            print!("{}", render_rules(&ability));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            principal,
            target,
            object,
        } => {
            let ability = resolve(&cache, &principal)?;
            let decision = cmd_check(&ability, &target, object.as_deref())?;
            println!("{}", render_decision(&decision));
            Ok(if decision.is_allowed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Commands::Filter { principal, target } => {
            let ability = resolve(&cache, &principal)?;
            let filter = ability.accessible_filter(target.action, &target.subject);
            println!("{}", filter.to_query());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Select {
            principal,
            target,
            documents,
        } => {
            let ability = resolve(&cache, &principal)?;
            let documents = read_documents(&documents)?;
            for doc in cmd_select(&ability, &target, &documents) {
                println!("{}", serde_json::to_string(doc).unwrap_or_default());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    if let Some(path) = path {
        info!(path = %path.display(), "loading engine config");
        return Ok(EngineConfig::load(path)?);
    }

    let default_path = Path::new(CONFIG_FILE);
    if default_path.exists() {
        info!(path = CONFIG_FILE, "loading engine config");
        Ok(EngineConfig::load(default_path)?)
    } else {
        debug!("no config file, using defaults");
        Ok(EngineConfig::default())
    }
}

fn resolve(cache: &AbilityCache, args: &PrincipalArgs) -> Result<Arc<Ability>> {
    let role: Role = args.role.parse().map_err(policy::Error::from)?;
    let principal = Principal::new(args.id.clone(), role);
    Ok(cache.get_or_resolve(&principal)?)
}

fn render_rules(ability: &Ability) -> String {
    ability
        .rules()
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{i}: {rule}\n"))
        .collect()
}

fn cmd_check(ability: &Ability, target: &TargetArgs, object: Option<&str>) -> Result<Decision> {
    let Some(object) = object else {
        return Ok(ability.check(target.action, Subject::Type(&target.subject)));
    };

    let fields = match serde_json::from_str(object) {
        Ok(serde_json::Value::Object(fields)) => fields,
        Ok(other) => {
            return Err(Error::InvalidObject(format!(
                "expected a JSON object, got {other}"
            )));
        }
        Err(e) => return Err(Error::InvalidObject(e.to_string())),
    };
    let doc = Document {
        type_name: target.subject.clone(),
        fields,
    };
    Ok(ability.check(target.action, &doc))
}

fn render_decision(decision: &Decision) -> String {
    match decision {
        Decision::Allow { rule } => format!("allow (rule {rule})"),
        Decision::Deny { reason } => format!("deny: {reason}"),
    }
}

fn read_documents(path: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| Error::InvalidDocuments {
        path: path.to_path_buf(),
        source,
    })
}

fn cmd_select<'a>(
    ability: &Ability,
    target: &TargetArgs,
    documents: &'a [Document],
) -> Vec<&'a Document> {
    let filter = ability.accessible_filter(target.action, &target.subject);
    documents
        .iter()
        .filter(|doc| doc.type_name == target.subject && filter.matches(*doc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn user_ability(id: &str) -> Ability {
        policy::resolve(&Principal::user(id)).unwrap()
    }

    fn target(action: ActionName, subject: &str) -> TargetArgs {
        TargetArgs {
            action,
            subject: subject.to_string(),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_command() {
        let cli = Cli::try_parse_from([
            "warden", "check", "--id", "u2", "--role", "admin", "--action", "delete", "--subject",
            "Resource",
        ])
        .unwrap();

        let Commands::Check {
            principal,
            target,
            object,
        } = cli.command
        else {
            panic!("expected check command");
        };
        assert_eq!(principal.id, "u2");
        assert_eq!(principal.role, "admin");
        assert_eq!(target.action, ActionName::Delete);
        assert_eq!(object, None);
    }

    #[test]
    fn test_parse_rejects_unknown_action() {
        let result = Cli::try_parse_from([
            "warden", "filter", "--id", "u2", "--action", "publish", "--subject", "Resource",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_rejects_unknown_role() {
        let cache = AbilityCache::default();
        let args = PrincipalArgs {
            id: "u1".to_string(),
            role: "root".to_string(),
        };
        let err = resolve(&cache, &args).unwrap_err();
        assert!(matches!(err, Error::Policy(e) if e.is_invalid_principal()));
    }

    #[test]
    fn test_render_rules() {
        let rendered = render_rules(&user_ability("u2"));
        assert_eq!(rendered.lines().count(), 4);
        assert!(rendered.starts_with(r#"0: can create all where createdBy = "u2""#));
    }

    #[test]
    fn test_check_object() {
        let ability = user_ability("u2");
        let update = target(ActionName::Update, "Resource");

        let allowed = cmd_check(&ability, &update, Some(r#"{"createdBy": "u2"}"#)).unwrap();
        assert_eq!(render_decision(&allowed), "allow (rule 2)");

        let denied = cmd_check(&ability, &update, Some(r#"{"createdBy": "u3"}"#)).unwrap();
        assert!(!denied.is_allowed());
    }

    #[test]
    fn test_check_type_only() {
        let ability = user_ability("u2");
        let decision = cmd_check(&ability, &target(ActionName::Manage, "Resource"), None).unwrap();
        assert_eq!(
            render_decision(&decision),
            "deny: no rule grants manage on Resource"
        );
    }

    #[test]
    fn test_check_rejects_non_object() {
        let ability = user_ability("u2");
        let err = cmd_check(&ability, &target(ActionName::Access, "Resource"), Some("[1]"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidObject(_)));
    }

    #[test]
    fn test_select_filters_by_type_and_owner() {
        let documents: Vec<Document> = serde_json::from_str(
            r#"[
                {"type": "Resource", "createdBy": "u2", "name": "r1"},
                {"type": "Resource", "createdBy": "u3", "name": "r2"},
                {"type": "Project", "createdBy": "u2", "name": "p1"}
            ]"#,
        )
        .unwrap();

        let selected = cmd_select(
            &user_ability("u2"),
            &target(ActionName::Access, "Resource"),
            &documents,
        );
        assert_eq!(selected, vec![&documents[0]]);
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
