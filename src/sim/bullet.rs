//! Bullets and the fixed-capacity bullet pool
//!
//! Bullets live in a slot vector that only ever grows, up to the pool
//! capacity. Each slot is in exactly one of two places: the active list or
//! the free stack. Acquire pops the free stack (or constructs a new slot while
//! under capacity), release swap-removes from the active list, both in O(1).
//!
//! Killing a bullet (clearing its `active` flag) is separate from releasing
//! it: collision code only marks bullets dead, and `cleanup` reclaims them at
//! a fixed point in the frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::bullet_triangle;
use crate::color::Color;
use crate::consts::MAX_BULLETS;

/// Who fired a bullet (and therefore what it can hit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Faction {
    Player,
    #[default]
    Enemy,
}

impl Faction {
    pub fn is_player(self) -> bool {
        self == Faction::Player
    }
}

/// Handle to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(u32);

impl BulletId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Unit direction of travel
    pub dir: Vec2,
    pub speed: f32,
    pub color: Color,
    pub faction: Faction,
    /// Cleared when the bullet hits something or leaves the arena
    pub active: bool,
}

impl Bullet {
    fn blank() -> Self {
        Self {
            pos: Vec2::ZERO,
            dir: Vec2::ZERO,
            speed: 0.0,
            color: Color::WHITE,
            faction: Faction::Enemy,
            active: false,
        }
    }

    /// Overwrite every field for a fresh shot
    pub fn reset(&mut self, pos: Vec2, dir: Vec2, speed: f32, color: Color, faction: Faction) {
        self.pos = pos;
        self.dir = dir.normalize_or_zero();
        self.speed = speed;
        self.color = color;
        self.faction = faction;
        self.active = true;
    }

    /// Advance along the direction of travel (dead bullets stay put)
    pub fn advance(&mut self, dt: f32) {
        if self.active {
            self.pos += self.dir * self.speed * dt;
        }
    }

    pub fn kill(&mut self) {
        self.active = false;
    }

    /// Collision footprint
    pub fn vertices(&self) -> [Vec2; 3] {
        bullet_triangle(self.pos, self.dir)
    }
}

/// Where a slot currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Membership {
    /// Index into the active list
    Active(usize),
    Free,
}

/// Fixed-capacity bullet pool
#[derive(Debug, Clone)]
pub struct BulletPool {
    slots: Vec<Bullet>,
    membership: Vec<Membership>,
    active: Vec<BulletId>,
    free: Vec<BulletId>,
    capacity: usize,
}

impl Default for BulletPool {
    fn default() -> Self {
        Self::new(MAX_BULLETS)
    }
}

impl BulletPool {
    /// Create an empty pool. Slots are constructed lazily up to `capacity`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.min(u32::MAX as usize);
        Self {
            slots: Vec::new(),
            membership: Vec::new(),
            active: Vec::new(),
            free: Vec::new(),
            capacity,
        }
    }

    /// Take a bullet from the pool and initialize it.
    ///
    /// Returns `None` once the free stack is empty and `capacity` slots exist.
    pub fn acquire(
        &mut self,
        pos: Vec2,
        dir: Vec2,
        speed: f32,
        color: Color,
        faction: Faction,
    ) -> Option<BulletId> {
        let id = match self.free.pop() {
            Some(id) => id,
            None if self.slots.len() < self.capacity => {
                let id = BulletId(self.slots.len() as u32);
                self.slots.push(Bullet::blank());
                self.membership.push(Membership::Free);
                id
            }
            None => return None,
        };

        self.slots[id.index()].reset(pos, dir, speed, color, faction);
        self.membership[id.index()] = Membership::Active(self.active.len());
        self.active.push(id);
        Some(id)
    }

    /// Return a bullet to the free stack. No-op for handles that aren't active.
    pub fn release(&mut self, id: BulletId) {
        let Some(&Membership::Active(index)) = self.membership.get(id.index()) else {
            return;
        };

        self.active.swap_remove(index);
        if let Some(&moved) = self.active.get(index) {
            self.membership[moved.index()] = Membership::Active(index);
        }
        self.membership[id.index()] = Membership::Free;
        self.slots[id.index()].active = false;
        self.free.push(id);
    }

    /// Release every active-list bullet whose `active` flag was cleared
    pub fn cleanup(&mut self) {
        let mut i = 0;
        while i < self.active.len() {
            let id = self.active[i];
            if self.slots[id.index()].active {
                i += 1;
            } else {
                // swap_remove pulls the last element into slot i, so don't advance
                self.release(id);
            }
        }
    }

    /// Kill and release everything (level reset)
    pub fn force_cleanup(&mut self) {
        for &id in &self.active {
            self.slots[id.index()].active = false;
        }
        self.cleanup();
    }

    /// Mark a bullet dead without releasing it
    pub fn kill(&mut self, id: BulletId) {
        if let Some(bullet) = self.slots.get_mut(id.index()) {
            bullet.kill();
        }
    }

    pub fn get(&self, id: BulletId) -> Option<&Bullet> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: BulletId) -> Option<&mut Bullet> {
        self.slots.get_mut(id.index())
    }

    /// Check whether a handle is currently in the active list
    pub fn is_active(&self, id: BulletId) -> bool {
        matches!(self.membership.get(id.index()), Some(Membership::Active(_)))
    }

    /// Handles in the active list (including killed-but-not-yet-cleaned bullets)
    pub fn active_ids(&self) -> &[BulletId] {
        &self.active
    }

    /// Live bullets (active list and flag still set)
    pub fn iter_active(&self) -> impl Iterator<Item = (BulletId, &Bullet)> + '_ {
        self.active
            .iter()
            .map(|&id| (id, &self.slots[id.index()]))
            .filter(|(_, b)| b.active)
    }

    /// Move every live bullet
    pub fn advance_all(&mut self, dt: f32) {
        for &id in &self.active {
            self.slots[id.index()].advance(dt);
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn total_created(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when the next acquire would fail
    pub fn is_exhausted(&self) -> bool {
        self.free.is_empty() && self.slots.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn shoot(pool: &mut BulletPool) -> Option<BulletId> {
        pool.acquire(Vec2::ZERO, Vec2::X, 100.0, Color::WHITE, Faction::Enemy)
    }

    #[test]
    fn test_capacity_two_scenario() {
        let mut pool = BulletPool::new(2);
        let a = shoot(&mut pool).unwrap();
        let b = shoot(&mut pool).unwrap();
        assert!(shoot(&mut pool).is_none());
        assert!(pool.is_exhausted());

        pool.release(a);
        let c = shoot(&mut pool).unwrap();
        assert_eq!(c, a, "released slot should be reused");
        assert_eq!(pool.total_created(), 2);
        assert!(pool.is_active(b) && pool.is_active(c));
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut pool = BulletPool::new(4);
        let a = shoot(&mut pool).unwrap();
        let _b = shoot(&mut pool).unwrap();
        pool.release(a);
        let (active, free) = (pool.active_count(), pool.free_count());
        pool.release(a);
        assert_eq!(pool.active_count(), active);
        assert_eq!(pool.free_count(), free);
    }

    #[test]
    fn test_release_unknown_handle_is_noop() {
        let mut pool = BulletPool::new(4);
        shoot(&mut pool);
        pool.release(BulletId(99));
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_acquire_resets_every_field() {
        let mut pool = BulletPool::new(1);
        let id = pool
            .acquire(Vec2::new(5.0, 5.0), Vec2::Y * 3.0, 50.0, Color::RED, Faction::Player)
            .unwrap();
        pool.get_mut(id).unwrap().advance(1.0);
        pool.release(id);

        let id = pool
            .acquire(Vec2::ZERO, Vec2::X, 10.0, Color::BLUE, Faction::Enemy)
            .unwrap();
        let bullet = pool.get(id).unwrap();
        assert_eq!(bullet.pos, Vec2::ZERO);
        assert_eq!(bullet.dir, Vec2::X);
        assert_eq!(bullet.speed, 10.0);
        assert_eq!(bullet.color, Color::BLUE);
        assert_eq!(bullet.faction, Faction::Enemy);
        assert!(bullet.active);
    }

    #[test]
    fn test_kill_then_cleanup() {
        let mut pool = BulletPool::new(8);
        let ids: Vec<_> = (0..5).map(|_| shoot(&mut pool).unwrap()).collect();
        pool.kill(ids[1]);
        pool.kill(ids[4]);

        // Killed bullets stay in the active list until cleanup
        assert_eq!(pool.active_count(), 5);
        assert_eq!(pool.iter_active().count(), 3);

        pool.cleanup();
        assert_eq!(pool.active_count(), 3);
        assert!(!pool.is_active(ids[1]));
        assert!(!pool.is_active(ids[4]));
        assert!(pool.is_active(ids[0]) && pool.is_active(ids[2]) && pool.is_active(ids[3]));
    }

    #[test]
    fn test_force_cleanup_frees_everything() {
        let mut pool = BulletPool::new(8);
        for _ in 0..6 {
            shoot(&mut pool);
        }
        pool.force_cleanup();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.free_count(), 6);
    }

    #[test]
    fn test_advance_moves_live_bullets_only() {
        let mut pool = BulletPool::new(2);
        let a = shoot(&mut pool).unwrap();
        let b = shoot(&mut pool).unwrap();
        pool.kill(b);
        pool.advance_all(0.5);
        assert_eq!(pool.get(a).unwrap().pos, Vec2::new(50.0, 0.0));
        assert_eq!(pool.get(b).unwrap().pos, Vec2::ZERO);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire,
        Release(usize),
        Kill(usize),
        Cleanup,
        ForceCleanup,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => Just(Op::Acquire),
            2 => (0usize..64).prop_map(Op::Release),
            2 => (0usize..64).prop_map(Op::Kill),
            1 => Just(Op::Cleanup),
            1 => Just(Op::ForceCleanup),
        ]
    }

    proptest! {
        #[test]
        fn prop_pool_accounting_holds(capacity in 0usize..32, ops in prop::collection::vec(op(), 0..200)) {
            let mut pool = BulletPool::new(capacity);
            let mut issued: Vec<BulletId> = Vec::new();

            for op in ops {
                match op {
                    Op::Acquire => {
                        if let Some(id) = shoot(&mut pool) {
                            issued.push(id);
                        }
                    }
                    Op::Release(i) if !issued.is_empty() => pool.release(issued[i % issued.len()]),
                    Op::Kill(i) if !issued.is_empty() => pool.kill(issued[i % issued.len()]),
                    Op::Cleanup => pool.cleanup(),
                    Op::ForceCleanup => pool.force_cleanup(),
                    _ => {}
                }

                prop_assert_eq!(pool.active_count() + pool.free_count(), pool.total_created());
                prop_assert!(pool.total_created() <= capacity);
                for &id in pool.active_ids() {
                    prop_assert!(pool.is_active(id));
                }
            }
        }
    }
}
