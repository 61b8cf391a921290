//! Admin management screen.

use crate::types::Admin;

use super::entity_list::EntityListScreen;

pub type AdminsScreen = EntityListScreen<Admin>;

pub const HEADER: &str = "Gerenciar Administradores";
pub const ADD_LABEL: &str = "Adicionar Administrador";
pub const CONFIRM_TITLE: &str = "Confirmar Exclusão";
pub const CONFIRM_LABEL: &str = "Sim, Excluir";
pub const CONFIRM_BODY: &str = "Tem certeza que deseja excluir este administrador? \
Ele perderá o acesso ao painel de controle. Esta ação não pode ser desfeita.";
