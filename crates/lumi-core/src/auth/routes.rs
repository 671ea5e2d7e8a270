use tracing::warn;

use super::users::Role;
use crate::dashboard::Tab;

/// Where the portal sends the user next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Anonymous entry view with the login form
    Entry,
    StudentDashboard,
    TeacherDashboard,
    GuardianDashboard,
    AdminDashboard,
}

impl Destination {
    /// Each role lands on exactly one dashboard
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Aluno => Destination::StudentDashboard,
            Role::Professor => Destination::TeacherDashboard,
            Role::Encarregado => Destination::GuardianDashboard,
            Role::Admin => Destination::AdminDashboard,
        }
    }

    /// Route by role name as it appears in storage. Unrecognized names go to
    /// the entry view.
    pub fn for_role_name(name: &str) -> Self {
        match name.parse::<Role>() {
            Ok(role) => Self::for_role(role),
            Err(e) => {
                warn!(error = %e, "Routing unknown role to entry view");
                Destination::Entry
            }
        }
    }

    /// Stable view identifier, e.g. for logs
    pub fn view_id(&self) -> &'static str {
        match self {
            Destination::Entry => "index",
            Destination::StudentDashboard => "dashboard-aluno",
            Destination::TeacherDashboard => "dashboard-professor",
            Destination::GuardianDashboard => "dashboard-encarregado",
            Destination::AdminDashboard => "dashboard-admin",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Destination::Entry => "Entrar",
            Destination::StudentDashboard => "Painel do Aluno",
            Destination::TeacherDashboard => "Painel do Professor",
            Destination::GuardianDashboard => "Painel do Encarregado",
            Destination::AdminDashboard => "Painel de Administração",
        }
    }

    /// Roles admitted by this view's guard. Empty means any signed-in user.
    pub fn allowed_roles(&self) -> &'static [Role] {
        match self {
            Destination::Entry => &[],
            Destination::StudentDashboard => &[Role::Aluno],
            Destination::TeacherDashboard => &[Role::Professor, Role::Admin],
            Destination::GuardianDashboard => &[Role::Encarregado],
            Destination::AdminDashboard => &[Role::Admin],
        }
    }

    /// Tabs shown on this view, in display order
    pub fn tabs(&self) -> &'static [Tab] {
        match self {
            Destination::Entry => &[],
            Destination::StudentDashboard => &[
                Tab::Overview,
                Tab::Progress,
                Tab::Exercise,
                Tab::Chat,
                Tab::Report,
            ],
            Destination::TeacherDashboard => &[Tab::Overview, Tab::Progress, Tab::Chat],
            Destination::GuardianDashboard => &[Tab::Progress, Tab::Chat, Tab::Report],
            Destination::AdminDashboard => &[Tab::Overview, Tab::Report],
        }
    }

    pub fn is_dashboard(&self) -> bool {
        !matches!(self, Destination::Entry)
    }
}
