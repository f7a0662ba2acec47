use bevy_ecs::prelude::Component;

/// Tag naming which kind of level entity this is.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Group(pub &'static str);

impl Group {
    pub const DECORATION: Group = Group("decoration");
    pub const TERRAIN: Group = Group("terrain");
    pub const PLATFORM: Group = Group("platform");
    pub const BOUNCER: Group = Group("bouncer");
    pub const TRIGGER: Group = Group("trigger");
    pub const MOVABLE: Group = Group("movable");
    pub const PLAYER: Group = Group("player");

    pub fn name(&self) -> &'static str {
        self.0
    }
}
