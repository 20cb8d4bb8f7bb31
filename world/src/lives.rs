//! Player lives and the game-over trigger.

/// Result of removing a life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LifeLoss {
    /// Nothing changed: the player is invincible or already out of lives.
    Ignored,
    /// A life was lost and some remain.
    Lost { remaining: u32 },
    /// The last life was lost. Returned at most once.
    Depleted,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Lives {
    remaining: u32,
    invincible: bool,
}

impl Lives {
    pub(crate) fn new(remaining: u32) -> Self {
        Self {
            remaining,
            invincible: false,
        }
    }

    pub(crate) fn remaining(&self) -> u32 {
        self.remaining
    }

    pub(crate) fn set_invincible(&mut self, invincible: bool) {
        self.invincible = invincible;
    }

    pub(crate) fn reduce(&mut self) -> LifeLoss {
        if self.invincible || self.remaining == 0 {
            return LifeLoss::Ignored;
        }

        self.remaining -= 1;
        if self.remaining == 0 {
            LifeLoss::Depleted
        } else {
            LifeLoss::Lost {
                remaining: self.remaining,
            }
        }
    }
}
