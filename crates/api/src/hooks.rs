// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use towerdef_domain::PendingDefinitions;

/// Callbacks into the surrounding wizard.
pub trait WizardHooks {
    /// The pending definitions changed and should be kept across wizard steps.
    fn definitions_changed(&mut self, _definitions: &PendingDefinitions) {}

    /// Every floor of the tower has been saved. Called once per session.
    fn all_floors_persisted(&mut self) {}
}

/// Hooks that ignore every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl WizardHooks for NoopHooks {}
