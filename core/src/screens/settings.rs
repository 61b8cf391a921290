//! Settings hub: a static menu of admin areas.

use crate::types::AppView;

pub const TITLE: &str = "Configurações";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsCard {
    pub icon: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub target: AppView,
}

pub const CARDS: [SettingsCard; 6] = [
    SettingsCard {
        icon: "fa-calendar-plus",
        title: "Agendar Serviço",
        description: "Crie um novo agendamento em nome de um cliente.",
        target: AppView::Schedule,
    },
    SettingsCard {
        icon: "fa-chart-line",
        title: "Relatórios",
        description: "Visualize o faturamento, serviços mais populares e mais.",
        target: AppView::Reports,
    },
    SettingsCard {
        icon: "fa-cut",
        title: "Serviços",
        description: "Gerencie os tipos de serviços, preços e durações.",
        target: AppView::ServicesAdmin,
    },
    SettingsCard {
        icon: "fa-user-tie",
        title: "Profissionais",
        description: "Adicione, edite ou remova profissionais e suas especialidades.",
        target: AppView::Professionals,
    },
    SettingsCard {
        icon: "fa-user-shield",
        title: "Administradores",
        description: "Controle quem tem acesso administrativo ao painel.",
        target: AppView::Admins,
    },
    SettingsCard {
        icon: "fa-clock",
        title: "Horário do Salão",
        description: "Defina os dias e horários de funcionamento.",
        target: AppView::SettingsAdmin,
    },
];

/// Keys a focused card reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Space,
    Other,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SettingsHub;

impl SettingsHub {
    pub fn cards(&self) -> &'static [SettingsCard] {
        &CARDS
    }

    pub fn click(&self, index: usize) -> Option<AppView> {
        let target = CARDS.get(index)?.target;
        tracing::debug!(?target, "settings card activated");
        Some(target)
    }

    pub fn key(&self, index: usize, key: Key) -> Option<AppView> {
        match key {
            Key::Enter | Key::Space => self.click(index),
            Key::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_card_navigates_somewhere_distinct() {
        let hub = SettingsHub;
        let targets: Vec<_> = (0..hub.cards().len()).filter_map(|i| hub.click(i)).collect();
        assert_eq!(targets.len(), 6);
        let unique: HashSet<_> = targets.iter().collect();
        assert_eq!(unique.len(), targets.len());
    }

    #[test]
    fn admins_card_opens_admin_screen() {
        let hub = SettingsHub;
        let index = hub
            .cards()
            .iter()
            .position(|c| c.title == "Administradores")
            .unwrap();
        assert_eq!(hub.key(index, Key::Enter), Some(AppView::Admins));
        assert_eq!(hub.key(index, Key::Space), Some(AppView::Admins));
        assert_eq!(hub.key(index, Key::Other), None);
    }

    #[test]
    fn out_of_range_card_does_nothing() {
        assert_eq!(SettingsHub.click(99), None);
    }
}
