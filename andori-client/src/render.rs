//! Plain-text rendering of screens and lists for the CLI

use crate::views::{LessonDetailState, LoadState, StudentProfileState};
use andori_common::models::{
    Aluno, Aula, GeneratedMaterial, MaterialItem, PerformanceRecord, Recommendation, Resumo,
    Roteiro, Turma, TurmaDetail,
};
use andori_common::avatar::select_turma_avatar;
use andori_common::time::{format_short_date, format_timestamp};
use std::fmt::Write;

/// Text formatter for the `andori` commands
pub struct TextRenderer;

/// Section heading; false when there is nothing loaded to list below it
fn section<T>(out: &mut String, title: &str, state: &LoadState<T>) -> bool {
    let _ = writeln!(out, "\n== {} ==", title);
    match state {
        LoadState::Idle => {
            let _ = writeln!(out, "-");
            false
        }
        LoadState::Loading => {
            let _ = writeln!(out, "Carregando...");
            false
        }
        LoadState::Failed(message) => {
            let _ = writeln!(out, "{}", message);
            false
        }
        LoadState::Loaded(_) => true,
    }
}

fn student_name<'a>(students: &'a [Aluno], aluno_id: &'a str) -> &'a str {
    students
        .iter()
        .find(|a| a.id == aluno_id)
        .map(|a| a.nome.as_str())
        .unwrap_or(aluno_id)
}

impl TextRenderer {
    pub fn format_turmas(turmas: &[Turma]) -> String {
        if turmas.is_empty() {
            return "Nenhuma turma cadastrada.".to_string();
        }
        turmas
            .iter()
            .map(|t| format!("{}  {}", t.id, t.nome))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_turma_detail(detail: &TurmaDetail) -> String {
        let mut out = format!("Turma {} ({})", detail.turma.nome, detail.turma.id);
        let _ = write!(out, "\nImagem: {}", select_turma_avatar(&detail.turma.id));
        if !detail.professores.is_empty() {
            let nomes: Vec<&str> = detail.professores.iter().map(|p| p.nome.as_str()).collect();
            let _ = write!(out, "\nProfessores: {}", nomes.join(", "));
        }
        out
    }

    pub fn format_students(students: &[Aluno]) -> String {
        if students.is_empty() {
            return "Nenhum estudante encontrado para esta turma.".to_string();
        }
        students
            .iter()
            .map(|a| format!("{}  {}", a.id, a.nome))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_aulas(aulas: &[Aula]) -> String {
        if aulas.is_empty() {
            return "Nenhuma aula cadastrada.".to_string();
        }
        aulas
            .iter()
            .map(|a| {
                format!(
                    "{}  {}  [{}]  {}",
                    a.id,
                    format_short_date(&a.data),
                    a.turma,
                    a.titulo
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn format_roteiro(out: &mut String, roteiro: &Roteiro) {
        for topico in &roteiro.topicos {
            let _ = writeln!(out, "  • {}", topico);
        }
        for fala in &roteiro.falas {
            let _ = writeln!(out, "{}", fala);
        }
        if !roteiro.exemplos.is_empty() {
            let _ = writeln!(out, "Exemplos:");
            for exemplo in &roteiro.exemplos {
                let _ = writeln!(out, "  - {}", exemplo);
            }
        }
    }

    fn format_resumo(out: &mut String, resumo: &Resumo) {
        let _ = writeln!(out, "Resumo: {}", resumo.texto);
        if !resumo.exemplo.trim().is_empty() {
            let _ = writeln!(out, "Exemplo: {}", resumo.exemplo);
        }
    }

    fn format_questions(out: &mut String, perguntas: &[String]) {
        if perguntas.is_empty() {
            return;
        }
        let _ = writeln!(out, "Perguntas:");
        for (i, pergunta) in perguntas.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, pergunta);
        }
    }

    pub fn format_generated(material: &GeneratedMaterial) -> String {
        let mut out = format!("Fonte: {}\n", material.source);
        if let Some(recomendacoes) = &material.recomendacoes {
            let _ = writeln!(out, "Recomendações: {}", recomendacoes);
        }
        Self::format_roteiro(&mut out, &material.roteiro);
        Self::format_resumo(&mut out, &material.resumo);
        Self::format_questions(&mut out, &material.perguntas);
        out
    }

    pub fn format_material(item: &MaterialItem) -> String {
        let mut out = format!("Material {} (fonte: {})", item.id, item.source);
        if let Some(created) = &item.created_at {
            let _ = write!(out, " criado em {}", format_timestamp(created));
        }
        out.push('\n');
        Self::format_roteiro(&mut out, &item.roteiro);
        Self::format_resumo(&mut out, &item.resumo);
        Self::format_questions(&mut out, &item.perguntas);
        out
    }

    pub fn format_performance(record: &PerformanceRecord, students: &[Aluno]) -> String {
        let mut out = String::new();
        if let Some(util) = record.material_util {
            let _ = writeln!(out, "Material: {}", util.label());
        }
        if !record.observacoes.trim().is_empty() {
            let _ = writeln!(out, "Observações: {}", record.observacoes);
        }
        for aluno in &record.alunos {
            let tags: Vec<&str> = aluno.desempenho.iter().map(|t| t.label()).collect();
            let _ = writeln!(
                out,
                "  {}: {}",
                student_name(students, &aluno.aluno_id),
                if tags.is_empty() { "-".to_string() } else { tags.join(", ") }
            );
        }
        out
    }

    pub fn format_recommendation(recommendation: &Recommendation) -> String {
        let mut out = String::new();
        if let Some(obs) = recommendation.observacoes.as_deref().filter(|s| !s.trim().is_empty()) {
            let _ = writeln!(out, "Observações da família: {}", obs);
        }
        if let Some(ia) = recommendation
            .recomendacoes_ia
            .as_deref()
            .filter(|s| !s.trim().is_empty())
        {
            let _ = writeln!(out, "Recomendações: {}", ia);
        }
        if out.is_empty() {
            out.push_str("Recomendações ainda não foram geradas.\n");
        }
        out
    }

    /// Lesson screen: header, material card, students and performance
    pub fn format_lesson_detail(state: &LessonDetailState) -> String {
        let mut out = String::new();
        match &state.lesson {
            LoadState::Loaded(aula) => {
                let _ = writeln!(out, "{}", aula.titulo);
                let _ = writeln!(out, "Turma: {}", aula.turma);
                let _ = writeln!(out, "Data: {}", format_short_date(&aula.data));
                if !aula.descricao.trim().is_empty() {
                    let _ = writeln!(out, "{}", aula.descricao);
                }
            }
            LoadState::Failed(message) => {
                let _ = writeln!(out, "{}", message);
                return out;
            }
            _ => {
                let _ = writeln!(out, "Carregando aula...");
            }
        }

        let _ = writeln!(out, "\n== Material ==");
        let _ = writeln!(out, "{}", state.material_copy());
        if let Some(item) = state.primary_material() {
            out.push_str(&Self::format_material(item));
        }

        let control = state.performance_control();
        let _ = writeln!(out, "\n== Desempenho ==");
        let _ = writeln!(
            out,
            "[{}]{}",
            control.label,
            if control.enabled { "" } else { " (indisponível)" }
        );
        if let Some(hint) = control.hint {
            let _ = writeln!(out, "{}", hint);
        }
        let students = state.students.loaded().map(Vec::as_slice).unwrap_or(&[]);
        if let Some(record) = state.saved_performance() {
            out.push_str(&Self::format_performance(record, students));
        }

        if section(&mut out, "Alunos", &state.students) {
            out.push_str(&Self::format_students(students));
            out.push('\n');
        }

        if let Some(error) = &state.action_error {
            let _ = writeln!(out, "\nErro: {}", error);
        }
        out
    }

    /// Student screen: profile, description, tag counts, chart and recommendations
    pub fn format_student_profile(state: &StudentProfileState) -> String {
        let mut out = String::new();
        let profile = match &state.profile {
            LoadState::Loaded(profile) => profile,
            LoadState::Failed(message) => return format!("{}\n", message),
            _ => return "Carregando aluno...\n".to_string(),
        };

        let _ = writeln!(out, "{} ({})", profile.nome, state.turma_label());
        let _ = writeln!(out, "Imagem: {}", state.avatar());
        for (label, value) in [
            ("Interesse", &profile.interesse),
            ("Preferência", &profile.preferencia),
            ("Dificuldade", &profile.dificuldade),
            ("Laudo", &profile.laudo),
            ("Nível de suporte", &profile.nivel_de_suporte),
        ] {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                let _ = writeln!(out, "{}: {}", label, value);
            }
        }
        if !state.descricao.trim().is_empty() {
            let _ = writeln!(out, "Descrição: {}", state.descricao);
        }
        if let Some(error) = &state.description_error {
            let _ = writeln!(out, "Erro: {}", error);
        }

        if section(&mut out, "Desempenho", &state.lessons) {
            for (tag, count) in state.tag_counts() {
                let _ = writeln!(out, "  {}: {}", tag.label(), count);
            }
            let chart = state.chart();
            if chart.is_empty() {
                let _ = writeln!(out, "Nenhum desempenho registrado.");
            }
            for point in chart {
                let _ = writeln!(out, "  {}  {:.2}", point.label, point.value);
            }
        }

        if section(&mut out, "Recomendações", &state.recommendation) {
            if let Some(recommendation) = state.recommendation.loaded() {
                out.push_str(&Self::format_recommendation(recommendation));
            }
        }
        out
    }
}
