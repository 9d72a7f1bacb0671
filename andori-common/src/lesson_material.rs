//! Offline lesson-material generator
//!
//! Builds a complete lesson plan by templating the subject into fixed copy,
//! adapted to a learner persona with a hyperfocus topic. Used when the
//! backend generator cannot be reached. Output depends only on the request.

use crate::models::{GeneratedMaterial, MaterialItem, Resumo, Roteiro};
use serde::{Deserialize, Serialize};

/// Source tag recorded on locally generated material
pub const FALLBACK_SOURCE: &str = "fallback";

/// Hyperfocus used when the subject matches no keyword
pub const DEFAULT_HYPERFOCUS: &str = "trens e sistemas de transporte";

const PERSONA_LABEL: &str = "Estudante autista (TEA) com hiperfoco";

/// Keyword (matched against the lowercased subject) to hyperfocus, first match wins
const HYPERFOCUS_KEYWORDS: &[(&[&str], &str)] = &[
    (&["geograf"], "mapas e lugares do mundo"),
    (&["hist"], "antiguidade e impérios"),
    (&["ciên", "cien"], "astronomia"),
    (&["portugu", "língua"], "tipos de texto"),
    (&["mat"], "números e padrões"),
    (&["biolog"], "dinossauros"),
];

/// Support profile of the simulated learner the material is planned for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub label: String,
    pub description: String,
    pub hyperfocus: String,
    pub supports: Vec<String>,
}

/// Inputs of the generator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRequest {
    pub assunto: String,
    pub descricao: String,
    pub turma: String,
    pub data: String,
    pub feedback: Option<String>,
    pub hyperfocus: Option<String>,
}

/// Generated lesson plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonMaterial {
    pub persona: Persona,
    pub recomendacoes: String,
    pub roteiro: String,
    pub resumo: String,
    pub exemplos: Vec<String>,
    pub perguntas: Vec<String>,
}

impl LessonMaterial {
    /// Shape returned by the backend generator, tagged as fallback output
    pub fn into_generated(self) -> GeneratedMaterial {
        GeneratedMaterial {
            roteiro: Roteiro {
                topicos: Vec::new(),
                falas: vec![self.roteiro],
                exemplos: self.exemplos.clone(),
            },
            resumo: Resumo {
                texto: self.resumo,
                exemplo: String::new(),
            },
            recomendacoes: Some(self.recomendacoes),
            exemplos: self.exemplos,
            perguntas: self.perguntas,
            source: FALLBACK_SOURCE.to_string(),
        }
    }

    /// Unsaved material record for a lesson
    pub fn into_material_item(self, aula_id: &str) -> MaterialItem {
        let generated = self.into_generated();
        MaterialItem {
            id: String::new(),
            aula_id: aula_id.to_string(),
            roteiro: generated.roteiro,
            resumo: generated.resumo,
            source: generated.source,
            accepted: false,
            recomendacoes: generated.recomendacoes,
            exemplos: generated.exemplos,
            perguntas: generated.perguntas,
            created_at: None,
        }
    }
}

fn supports(first_visual: &str) -> Vec<String> {
    [
        "Antecipação da agenda e objetivos",
        first_visual,
        "Linguagem direta, sem ambiguidades",
        "Tempo extra para resposta e pausas curtas",
        "Opções de participação com baixa sobrecarga sensorial",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Hyperfocus topic for a subject
pub fn choose_hyperfocus(subject: &str) -> &'static str {
    let subject = subject.to_lowercase();
    HYPERFOCUS_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| subject.contains(k)))
        .map(|(_, hyperfocus)| *hyperfocus)
        .unwrap_or(DEFAULT_HYPERFOCUS)
}

pub fn minecraft_persona() -> Persona {
    Persona {
        label: PERSONA_LABEL.to_string(),
        description: "Comunicação clara e concreta, rotina previsível, pistas visuais, tempo para processamento e estratégias de regulação sensorial.".to_string(),
        hyperfocus: "Minecraft".to_string(),
        supports: supports("Instruções passo a passo com exemplos visuais (prints do Minecraft)"),
    }
}

/// Reference persona whose hyperfocus comes from the subject keywords
pub fn default_persona(subject: &str) -> Persona {
    Persona {
        label: PERSONA_LABEL.to_string(),
        description: "Persona de referência para planejar: comunicação clara e concreta, rotina previsível, pistas visuais, tempo para processamento e estratégias de regulação sensorial.".to_string(),
        hyperfocus: choose_hyperfocus(subject).to_string(),
        supports: supports("Instruções passo a passo com exemplos visuais"),
    }
}

/// Persona for a subject; an explicit hyperfocus overrides the keyword table
pub fn build_persona(subject: &str, hyperfocus: Option<&str>) -> Persona {
    match hyperfocus.filter(|h| !h.is_empty()) {
        Some(h) if h.trim().eq_ignore_ascii_case("minecraft") => minecraft_persona(),
        Some(h) => Persona {
            hyperfocus: h.to_string(),
            ..default_persona(subject)
        },
        None => default_persona(subject),
    }
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

pub fn generate_lesson_material(request: &LessonRequest) -> LessonMaterial {
    let persona = build_persona(&request.assunto, request.hyperfocus.as_deref());
    let assunto = request.assunto.as_str();
    let foco = persona.hyperfocus.as_str();
    let header = format!(
        "{} — {} ({})",
        assunto,
        non_empty(&request.turma, "turma"),
        non_empty(&request.data, "sem data")
    );
    let improve = match request.feedback.as_deref() {
        Some(feedback) if !feedback.is_empty() => format!(" Ajustes pedidos: {}.", feedback),
        _ => String::new(),
    };

    let recomendacoes = format!(
        "Checklist de suporte (TEA + hiperfoco em {foco}):\n\
         - Antecipe objetivos na lousa (agenda visual) e a sequência da aula.\n\
         - Dê instruções curtas e numeradas; mostre um exemplo concreto.\n\
         - Ofereça opções de participação: falar, apontar, escrever ou montar no {foco}.\n\
         - Combine um sinal para pausas curtas; permita tempo extra para resposta.\n\
         - Valide tentativas; foque no progresso e na clareza.{improve}"
    );

    let roteiro = [
        format!("1) Abertura ({header})"),
        format!("Professor: \"Hoje vamos estudar {assunto} usando o {foco} como nosso mundo de exemplos.\""),
        "Mostre a agenda visual (3 a 5 etapas).".to_string(),
        String::new(),
        "2) Conexão com o hiperfoco".to_string(),
        format!("Professor: \"Se {assunto} fosse uma construção no {foco}, que blocos/recursos seriam necessários?\""),
        format!("Exemplo ({foco}): \"Para explicar {assunto}, pense que precisamos coletar recursos, combinar itens e seguir um plano de construção.\""),
        String::new(),
        "3) Mini‑exposição com analogias".to_string(),
        "Fale frases curtas e mostre 1 imagem/diagrama. Evite parágrafos longos.".to_string(),
        "Professor: \"Passo 1..., Passo 2..., Passo 3...\"".to_string(),
        String::new(),
        "4) Atividade guiada (passos curtos)".to_string(),
        "Instrua em etapas numeradas e visíveis:".to_string(),
        "- Passo 1: (ex.: listar conceitos‑bloco).".to_string(),
        "- Passo 2: (ex.: ligar conceitos como se fossem crafting).".to_string(),
        format!("- Passo 3: (ex.: montar a 'construção' final que explica {assunto})."),
        "Ofereça opção de registro: quadro, caderno, cartões ou esquema que lembre crafting.".to_string(),
        String::new(),
        "5) Checagem de compreensão".to_string(),
        "Pergunte: \"Qual bloco/parte foi mais difícil? O que falta para completar a construção?\"".to_string(),
        format!("Professor: \"Explique usando o exemplo do {foco}.\""),
        String::new(),
        "6) Fechamento e tarefa".to_string(),
        format!("Checklist do que aprendemos. Tarefa curta: escrever/desenhar um exemplo de {assunto} dentro do {foco}."),
    ]
    .join("\n");

    let mediacao = if request.descricao.is_empty() {
        String::new()
    } else {
        format!("Baseie a mediação nesta descrição: \"{}\".", request.descricao)
    };
    let resumo = format!(
        "Ao final, os estudantes explicam os pontos‑chave de \"{assunto}\" e \
         relacionam com {foco}. Use um mapa mental simples com \
         3‑5 palavras‑chave. {mediacao}"
    );

    let exemplos = vec![
        format!("No {foco}: comparar {assunto} a uma construção com mineração, crafting e etapas."),
        format!("Usar redstone como analogia para causa‑efeito ao explicar {assunto}."),
        format!("Criar um 'desafio' onde cada conceito de {assunto} é um bloco que precisa se conectar."),
    ];
    let perguntas = vec![
        format!("Se {assunto} fosse uma construção no {foco}, qual bloco faltaria?"),
        format!("Qual parte de {assunto} liga com crafting? O que entra primeiro?"),
        format!("Explique {assunto} usando um exemplo do {foco} que você já jogou."),
    ];

    LessonMaterial {
        persona,
        recomendacoes,
        roteiro,
        resumo,
        exemplos,
        perguntas,
    }
}
