//! Client error taxonomy and user-facing messages

use thiserror::Error;

/// Message shown when the backend cannot be reached at all
pub const NETWORK_MESSAGE: &str =
    "Não foi possível conectar ao backend. Verifique se o servidor está em execução.";

/// Message shown when the backend answers 503
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Banco de dados não configurado.";

/// Backend resource a request addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Turma,
    /// Students listed for a class
    TurmaStudents,
    Aluno,
    Aula,
    Material,
    MaterialFeedback,
    Performance,
    Description,
    Recommendation,
}

impl Resource {
    /// Copy shown when the resource does not exist (HTTP 404)
    pub fn not_found_message(self) -> &'static str {
        match self {
            Resource::Turma => "Turma não encontrada.",
            Resource::TurmaStudents => "Nenhum estudante encontrado para esta turma.",
            Resource::Aluno => "Aluno não encontrado.",
            Resource::Aula => "Aula não encontrada.",
            Resource::Material => "Material não encontrado.",
            Resource::MaterialFeedback => "Aula (ARRMD) não encontrada.",
            Resource::Performance => "Desempenho não encontrado.",
            Resource::Description => "Aluno não encontrado durante a atualização.",
            Resource::Recommendation => "Recomendações ainda não foram geradas.",
        }
    }
}

/// A request kind: its resource plus the generic failure copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    pub resource: Resource,
    pub failure: &'static str,
}

impl Operation {
    pub const fn new(resource: Resource, failure: &'static str) -> Self {
        Self { resource, failure }
    }

    pub const LIST_TURMAS: Operation =
        Operation::new(Resource::Turma, "Não foi possível carregar as turmas.");
    pub const GET_TURMA: Operation = Operation::new(Resource::Turma, "Erro ao buscar turma.");
    pub const CREATE_TURMA: Operation = Operation::new(Resource::Turma, "Erro ao criar turma.");
    pub const UPDATE_TURMA: Operation =
        Operation::new(Resource::Turma, "Erro ao atualizar turma.");
    pub const DELETE_TURMA: Operation = Operation::new(Resource::Turma, "Erro ao deletar turma.");
    pub const LIST_TURMA_STUDENTS: Operation = Operation::new(
        Resource::TurmaStudents,
        "Não foi possível carregar os estudantes desta turma.",
    );

    pub const LIST_STUDENTS: Operation = Operation::new(
        Resource::TurmaStudents,
        "Não foi possível carregar os estudantes desta turma.",
    );
    pub const GET_STUDENT: Operation = Operation::new(
        Resource::Aluno,
        "Não foi possível carregar as informações do aluno.",
    );

    pub const LIST_AULAS: Operation =
        Operation::new(Resource::Aula, "Não foi possível carregar as aulas.");
    pub const GET_AULA: Operation = Operation::new(
        Resource::Aula,
        "Não foi possível carregar os detalhes da aula.",
    );
    pub const CREATE_AULA: Operation = Operation::new(Resource::Aula, "Erro ao criar aula.");
    pub const UPDATE_AULA: Operation = Operation::new(Resource::Aula, "Erro ao atualizar aula.");
    pub const DELETE_AULA: Operation = Operation::new(Resource::Aula, "Erro ao deletar aula.");

    pub const GENERATE_MATERIAL: Operation = Operation::new(
        Resource::Material,
        "Não foi possível gerar o material.",
    );
    pub const LIST_MATERIAL: Operation = Operation::new(
        Resource::Material,
        "Não foi possível carregar os materiais aprovados desta aula.",
    );
    pub const ACCEPT_MATERIAL: Operation = Operation::new(
        Resource::Material,
        "Não foi possível aprovar o material.",
    );
    pub const DELETE_MATERIAL: Operation = Operation::new(
        Resource::Material,
        "Não foi possível excluir o material.",
    );
    pub const SET_MATERIAL_FEEDBACK: Operation = Operation::new(
        Resource::MaterialFeedback,
        "Não foi possível salvar o feedback do material.",
    );
    pub const GET_MATERIAL_FEEDBACK: Operation = Operation::new(
        Resource::MaterialFeedback,
        "Não foi possível carregar o feedback do material.",
    );

    pub const GET_PERFORMANCE: Operation = Operation::new(
        Resource::Performance,
        "Não foi possível carregar o desempenho salvo desta aula.",
    );
    pub const SAVE_PERFORMANCE: Operation = Operation::new(
        Resource::Performance,
        "Não foi possível salvar o desempenho.",
    );
    pub const DELETE_PERFORMANCE: Operation = Operation::new(
        Resource::Performance,
        "Não foi possível excluir o desempenho.",
    );

    pub const SAVE_DESCRIPTION: Operation = Operation::new(
        Resource::Description,
        "Não foi possível salvar a descrição. Tente novamente.",
    );

    pub const GET_RECOMMENDATION: Operation = Operation::new(
        Resource::Recommendation,
        "Não foi possível carregar as recomendações.",
    );
    pub const CREATE_RECOMMENDATION: Operation = Operation::new(
        Resource::Recommendation,
        "Não foi possível gerar as recomendações.",
    );
}

/// Backend client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure (refused, reset, timed out)
    #[error("Network error: {0}")]
    Network(String),

    #[error("{resource:?} not found: {body}")]
    NotFound { resource: Resource, body: String },

    #[error("Service unavailable: {body}")]
    ServiceUnavailable { body: String },

    #[error("API error {status}: {body}")]
    Api {
        operation: Operation,
        status: u16,
        body: String,
    },

    #[error("Parse error: {message}")]
    Parse {
        operation: Operation,
        message: String,
    },

    /// HTTP client could not be constructed
    #[error("Client setup error: {0}")]
    Setup(String),
}

impl ClientError {
    /// Portuguese copy to render inline for this failure
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) => NETWORK_MESSAGE.to_string(),
            ClientError::NotFound { resource, .. } => resource.not_found_message().to_string(),
            ClientError::ServiceUnavailable { .. } => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            ClientError::Api {
                operation,
                status,
                body,
            } => format!("{} (HTTP {}: {})", operation.failure, status, body),
            ClientError::Parse { operation, .. } => operation.failure.to_string(),
            ClientError::Setup(_) => NETWORK_MESSAGE.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }

    /// Backend unreachable or without a database; local fallbacks apply
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(
            self,
            ClientError::Network(_) | ClientError::ServiceUnavailable { .. }
        )
    }

    /// HTTP status, when the backend answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::NotFound { .. } => Some(404),
            ClientError::ServiceUnavailable { .. } => Some(503),
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
