//! andori - command-line front end for the Andori backend
//!
//! Lists and edits turmas and aulas, renders the lesson and student screens
//! as text, generates lesson material (offline when the backend is down) and
//! records desempenho.

use std::path::PathBuf;
use std::process::ExitCode;

use andori_client::api::ApiClient;
use andori_client::render::TextRenderer;
use andori_client::views::{LessonDetailController, StudentProfileController, ViewError};
use andori_client::{ClientError, LegacyStore, MaterialService};
use andori_common::config::{ClientConfig, DEFAULT_LOG_LEVEL};
use andori_common::events::EventBus;
use andori_common::models::{AulaCreate, AulaUpdate, PerformanceDraft, RecommendationCreate, StudentPerformance};
use andori_common::performance::dedup_tags;
use andori_common::{MaterialUsefulness, PerformanceTag};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for andori
#[derive(Parser, Debug)]
#[command(name = "andori")]
#[command(about = "Teacher tools for the Andori backend")]
#[command(version)]
struct Cli {
    /// Backend origin, e.g. http://localhost:8000
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Path to config.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classes
    Turmas {
        #[command(subcommand)]
        action: TurmaAction,
    },
    /// Lessons
    Aulas {
        #[command(subcommand)]
        action: AulaAction,
    },
    /// Student profile
    Aluno {
        #[command(subcommand)]
        action: AlunoAction,
    },
    /// Lesson material
    Material {
        #[command(subcommand)]
        action: MaterialAction,
    },
    /// Per-lesson performance records
    Desempenho {
        #[command(subcommand)]
        action: DesempenhoAction,
    },
    /// Family notes and AI recommendations
    Recomendacao {
        #[command(subcommand)]
        action: RecomendacaoAction,
    },
}

#[derive(Subcommand, Debug)]
enum TurmaAction {
    List,
    Show { id: String },
    Create { nome: String },
    Rename { id: String, nome: String },
    Delete { id: String },
    /// Students enrolled in the class
    Students { id: String },
}

#[derive(Subcommand, Debug)]
enum AulaAction {
    List,
    /// Render the lesson screen
    Show { id: String },
    Create {
        #[arg(long)]
        assunto: String,
        /// Class name
        #[arg(long)]
        turma: String,
        #[arg(long)]
        turma_id: Option<String>,
        /// Lesson date (YYYY-MM-DD)
        #[arg(long)]
        data: String,
        #[arg(long, default_value = "")]
        descricao: String,
    },
    /// Change the subject or description of a lesson
    Update {
        id: String,
        #[arg(long)]
        assunto: Option<String>,
        #[arg(long)]
        descricao: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum AlunoAction {
    /// Render the student screen
    Show { id: String },
    /// Save how the student behaves in class
    Describe { id: String, texto: String },
}

#[derive(Subcommand, Debug)]
enum MaterialAction {
    /// Generate a draft for a lesson
    Generate {
        aula_id: String,
        /// What to change relative to the previous draft
        #[arg(long)]
        feedback: Option<String>,
        /// Student interest used to frame the material ("minecraft" for the Minecraft persona)
        #[arg(long)]
        hyperfocus: Option<String>,
        /// Accept the draft right away
        #[arg(long)]
        accept: bool,
    },
    /// Accepted material of a lesson
    List { aula_id: String },
    /// Accept the cached draft of a lesson
    Accept { aula_id: String },
    /// Delete the lesson's material
    Delete { aula_id: String },
    /// Forget local drafts of a lesson
    Discard { aula_id: String },
}

#[derive(Subcommand, Debug)]
enum DesempenhoAction {
    Show { aula_id: String },
    Save {
        aula_id: String,
        /// muito_util, util or pouco_util
        #[arg(long)]
        material_util: Option<String>,
        #[arg(long, default_value = "")]
        observacoes: String,
        /// ALUNO_ID=tag[,tag...], e.g. 12=atento,focado
        #[arg(long = "aluno", value_name = "ALUNO_ID=TAGS")]
        alunos: Vec<String>,
    },
    /// Add or remove one tag for one student and save
    Toggle {
        aula_id: String,
        aluno_id: String,
        /// disperso, razoavel, atento or focado
        tag: String,
    },
    Delete { aula_id: String },
}

#[derive(Subcommand, Debug)]
enum RecomendacaoAction {
    Show {
        #[arg(long)]
        aluno: Option<String>,
        #[arg(long)]
        aula: Option<String>,
    },
    /// Submit family notes for a lesson and generate recommendations
    Create {
        aluno_id: String,
        aula_id: String,
        observacoes: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging first; the configured level replaces the default unless RUST_LOG is set
    let env_filter = EnvFilter::try_from_default_env().ok();
    let from_env = env_filter.is_some();
    let (filter, filter_handle) =
        reload::Layer::new(env_filter.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL)));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::load(cli.api_base_url.as_deref(), cli.config.as_deref());
    if !from_env {
        if let Err(e) = filter_handle.modify(|filter| *filter = EnvFilter::new(&config.log_level)) {
            warn!(error = %e, "Could not apply configured log level");
        }
    }

    info!(
        "Starting andori v{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("ANDORI_BUILD")
    );
    debug!(api_root = %config.api_root(), "Backend");

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

/// Portuguese copy for client and view errors, the error chain otherwise
fn user_message(error: &anyhow::Error) -> String {
    if let Some(e) = error.downcast_ref::<ViewError>() {
        return e.user_message();
    }
    if let Some(e) = error.downcast_ref::<ClientError>() {
        return e.user_message();
    }
    format!("{:#}", error)
}

async fn run(command: Command, config: &ClientConfig) -> Result<()> {
    let client = ApiClient::new(config)?;
    let events = EventBus::default();

    match command {
        Command::Turmas { action } => turmas(&client, action).await,
        Command::Aulas { action } => aulas(&client, events, action).await,
        Command::Aluno { action } => aluno(&client, config, events, action).await,
        Command::Material { action } => material(&client, config, events, action).await,
        Command::Desempenho { action } => desempenho(&client, events, action).await,
        Command::Recomendacao { action } => recomendacao(&client, action).await,
    }
}

async fn turmas(client: &ApiClient, action: TurmaAction) -> Result<()> {
    match action {
        TurmaAction::List => {
            println!("{}", TextRenderer::format_turmas(&client.turmas().list().await?));
        }
        TurmaAction::Show { id } => {
            println!("{}", TextRenderer::format_turma_detail(&client.turmas().get(&id).await?));
        }
        TurmaAction::Create { nome } => {
            let turma = client.turmas().create(&nome).await?;
            println!("Turma criada: {}  {}", turma.id, turma.nome);
        }
        TurmaAction::Rename { id, nome } => {
            let turma = client.turmas().update(&id, &nome).await?;
            println!("Turma atualizada: {}  {}", turma.id, turma.nome);
        }
        TurmaAction::Delete { id } => {
            client.turmas().delete(&id).await?;
            println!("Turma removida.");
        }
        TurmaAction::Students { id } => {
            println!("{}", TextRenderer::format_students(&client.turmas().students(&id).await?));
        }
    }
    Ok(())
}

async fn aulas(client: &ApiClient, events: EventBus, action: AulaAction) -> Result<()> {
    match action {
        AulaAction::List => {
            println!("{}", TextRenderer::format_aulas(&client.aulas().list().await?));
        }
        AulaAction::Show { id } => {
            let controller = LessonDetailController::new(client.clone(), events);
            controller.open(&id).await?;
            print!("{}", TextRenderer::format_lesson_detail(&controller.state().await));
        }
        AulaAction::Create {
            assunto,
            turma,
            turma_id,
            data,
            descricao,
        } => {
            let aula = client
                .aulas()
                .create(&AulaCreate {
                    assunto,
                    turma,
                    turma_id,
                    data,
                    descricao,
                    arquivo: None,
                })
                .await?;
            println!("Aula criada: {}  {}", aula.id, aula.titulo);
        }
        AulaAction::Update {
            id,
            assunto,
            descricao,
        } => {
            if assunto.is_none() && descricao.is_none() {
                bail!("Informe --assunto ou --descricao.");
            }
            let aula = client
                .aulas()
                .update(
                    &id,
                    &AulaUpdate {
                        assunto,
                        descricao,
                        upload_arquivo: None,
                    },
                )
                .await?;
            println!("Aula atualizada: {}  {}", aula.id, aula.titulo);
        }
        AulaAction::Delete { id } => {
            client.aulas().delete(&id).await?;
            println!("Aula removida.");
        }
    }
    Ok(())
}

async fn aluno(
    client: &ApiClient,
    config: &ClientConfig,
    events: EventBus,
    action: AlunoAction,
) -> Result<()> {
    let controller = StudentProfileController::new(client.clone(), events)
        .with_legacy_store(LegacyStore::new(&config.legacy_store_dir));
    match action {
        AlunoAction::Show { id } => {
            controller.open(&id).await?;
            print!("{}", TextRenderer::format_student_profile(&controller.state().await));
        }
        AlunoAction::Describe { id, texto } => {
            controller.open(&id).await?;
            controller.save_description(&texto).await?;
            println!("Descrição salva.");
        }
    }
    Ok(())
}

async fn material(
    client: &ApiClient,
    config: &ClientConfig,
    events: EventBus,
    action: MaterialAction,
) -> Result<()> {
    let service = MaterialService::new(client.clone(), LegacyStore::new(&config.legacy_store_dir))
        .with_events(events.clone());
    match action {
        MaterialAction::Generate {
            aula_id,
            feedback,
            hyperfocus,
            accept,
        } => {
            let aula = client.aulas().get(&aula_id).await?;
            let draft = service
                .generate(&aula, feedback.as_deref(), hyperfocus.as_deref())
                .await?;
            print!("{}", TextRenderer::format_generated(&draft));
            if accept {
                let item = service.accept(&aula_id, &draft).await?;
                println!("Material aceito para a aula {}.", item.aula_id);
            }
        }
        MaterialAction::List { aula_id } => {
            let items = client.material().list_by_aula(&aula_id).await?;
            if items.is_empty() {
                println!("Você ainda não criou o material.");
            }
            for item in &items {
                print!("{}", TextRenderer::format_material(item));
            }
        }
        MaterialAction::Accept { aula_id } => {
            let draft = service
                .cached_draft(&aula_id)
                .await
                .ok_or_else(|| anyhow!("Nenhum rascunho de material para a aula {}.", aula_id))?;
            let item = service.accept(&aula_id, &draft).await?;
            println!("Material aceito para a aula {}.", item.aula_id);
        }
        MaterialAction::Delete { aula_id } => {
            let controller = LessonDetailController::new(client.clone(), events);
            controller.open(&aula_id).await?;
            controller.delete_material().await?;
            println!("Material removido.");
        }
        MaterialAction::Discard { aula_id } => {
            service
                .discard(&aula_id)
                .await
                .context("Falha ao limpar rascunhos locais")?;
            println!("Rascunhos locais removidos.");
        }
    }
    Ok(())
}

async fn desempenho(client: &ApiClient, events: EventBus, action: DesempenhoAction) -> Result<()> {
    let controller = LessonDetailController::new(client.clone(), events);
    match action {
        DesempenhoAction::Show { aula_id } => {
            controller.open(&aula_id).await?;
            let state = controller.state().await;
            match state.saved_performance() {
                Some(record) => {
                    let students = state.students.loaded().map(Vec::as_slice).unwrap_or(&[]);
                    print!("{}", TextRenderer::format_performance(record, students));
                }
                None => println!("{}", state.performance_control().label),
            }
        }
        DesempenhoAction::Save {
            aula_id,
            material_util,
            observacoes,
            alunos,
        } => {
            let draft = PerformanceDraft {
                material_util: material_util
                    .as_deref()
                    .map(str::parse::<MaterialUsefulness>)
                    .transpose()?,
                observacoes,
                alunos: alunos
                    .iter()
                    .map(|arg| parse_student_tags(arg))
                    .collect::<Result<Vec<_>>>()?,
            };
            controller.open(&aula_id).await?;
            let record = controller.save_performance(&draft).await?;
            println!("Desempenho salvo ({} alunos).", record.alunos.len());
        }
        DesempenhoAction::Toggle {
            aula_id,
            aluno_id,
            tag,
        } => {
            let tag = tag.parse::<PerformanceTag>()?;
            controller.open(&aula_id).await?;
            let mut draft = controller
                .state()
                .await
                .saved_performance()
                .map(PerformanceDraft::from_record)
                .unwrap_or_default();
            draft.toggle(&aluno_id, tag);
            let record = controller.save_performance(&draft).await?;
            let tags: Vec<&str> = record.tags_for(&aluno_id).iter().map(|t| t.label()).collect();
            println!("Desempenho de {}: {}", aluno_id, tags.join(", "));
        }
        DesempenhoAction::Delete { aula_id } => {
            controller.open(&aula_id).await?;
            controller.delete_performance().await?;
            println!("Desempenho removido.");
        }
    }
    Ok(())
}

async fn recomendacao(client: &ApiClient, action: RecomendacaoAction) -> Result<()> {
    match action {
        RecomendacaoAction::Show { aluno, aula } => {
            if aluno.is_none() && aula.is_none() {
                bail!("Informe --aluno ou --aula.");
            }
            let recommendation = client
                .recommendation()
                .get(aluno.as_deref(), aula.as_deref())
                .await?;
            print!("{}", TextRenderer::format_recommendation(&recommendation));
        }
        RecomendacaoAction::Create {
            aluno_id,
            aula_id,
            observacoes,
        } => {
            let result = client
                .recommendation()
                .create(&RecommendationCreate {
                    aluno_id,
                    arrmd_id: aula_id,
                    observacoes,
                })
                .await?;
            println!("{}", result.recomendacoes_ia);
        }
    }
    Ok(())
}

/// Parse `ALUNO_ID=tag[,tag...]`
fn parse_student_tags(arg: &str) -> Result<StudentPerformance> {
    let (aluno_id, tags) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Formato esperado ALUNO_ID=tag[,tag...]: {}", arg))?;
    let aluno_id = aluno_id.trim();
    if aluno_id.is_empty() {
        bail!("Aluno sem id: {}", arg);
    }
    let parsed = tags
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(str::parse::<PerformanceTag>)
        .collect::<andori_common::Result<Vec<_>>>()?;
    Ok(StudentPerformance {
        aluno_id: aluno_id.to_string(),
        desempenho: dedup_tags(parsed),
    })
}
