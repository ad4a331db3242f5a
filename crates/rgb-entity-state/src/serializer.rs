//! Two-pass save/load of an entity's serializable members.

use rgb_bundle::Bundle;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    Category, DriftKind, EntityError, EntityMembers, EntityResult, LoadReport, MemberRef,
    SaveReport, SchemaDrift, Serializable,
};

/// Keys under which the category bundles are stored in the root bundle.
///
/// Category bundles are named after their key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    pub components_key: String,
    pub controls_key: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            components_key: Category::Components.name().to_owned(),
            controls_key: Category::Controls.name().to_owned(),
        }
    }
}

impl SerializerConfig {
    /// Check that the two categories are stored under distinct keys.
    pub fn validate(&self) -> EntityResult<()> {
        if self.components_key == self.controls_key {
            return Err(EntityError::SharedCategoryKey(self.components_key.clone()));
        }
        Ok(())
    }

    fn key(&self, category: Category) -> &str {
        match category {
            Category::Components => &self.components_key,
            Category::Controls => &self.controls_key,
        }
    }
}

/// Saves and restores entity state. Holds configuration only; every call is
/// independent.
#[derive(Debug, Clone, Default)]
pub struct EntityStateSerializer {
    config: SerializerConfig,
}

impl EntityStateSerializer {
    /// Create a serializer with the default category keys.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a serializer with custom category keys.
    ///
    /// Fails if both categories use the same key, since saving would then
    /// overwrite the components bundle with the controls bundle.
    pub fn with_config(config: SerializerConfig) -> EntityResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    /// Write every serializable component and control of `entity` into
    /// `root`.
    ///
    /// Each member gets a fresh instance bundle named by its type tag, filed
    /// under that tag in its category bundle. Both category bundles are then
    /// put into `root`, replacing any previous ones. Non-serializable members
    /// are skipped.
    pub fn save<E>(&self, entity: &E, root: &mut Bundle) -> SaveReport
    where
        E: EntityMembers + ?Sized,
    {
        let mut report = SaveReport::default();

        let components = self.write_category(
            Category::Components,
            entity
                .components()
                .iter()
                .filter_map(|c| c.as_serializable()),
            &mut report,
        );
        let controls = self.write_category(
            Category::Controls,
            entity.controls().iter().filter_map(|c| c.as_serializable()),
            &mut report,
        );

        root.put(self.config.components_key.clone(), components);
        root.put(self.config.controls_key.clone(), controls);

        debug!(
            bundle = root.name(),
            components = report.written_in(Category::Components),
            controls = report.written_in(Category::Controls),
            "saved entity state"
        );

        report
    }

    fn write_category<'a>(
        &self,
        category: Category,
        members: impl Iterator<Item = &'a dyn Serializable>,
        report: &mut SaveReport,
    ) -> Bundle {
        let mut category_bundle = Bundle::new(self.config.key(category));

        for member in members {
            let tag = member.type_tag();
            let mut instance = Bundle::new(tag);
            member.write(&mut instance);

            if category_bundle.exists(tag) {
                warn!(
                    %category,
                    type_tag = tag,
                    "multiple serializable members share a type tag, only the last is saved"
                );
                report.collisions.push(MemberRef::new(category, tag));
            }

            trace!(%category, type_tag = tag, entries = instance.len(), "wrote member");
            category_bundle.put(tag, instance);
            report.written.push(MemberRef::new(category, tag));
        }

        category_bundle
    }

    /// Restore every serializable component and control of `entity` from
    /// `root`.
    ///
    /// Members are matched to instance bundles by type tag. A member with no
    /// saved state is left unchanged, logged at warn level and recorded as
    /// [`SchemaDrift`]; the remaining members are still restored. This never
    /// fails: a root with missing or malformed category bundles yields drift
    /// entries, not errors.
    pub fn load<E>(&self, entity: &mut E, root: &Bundle) -> LoadReport
    where
        E: EntityMembers + ?Sized,
    {
        let mut report = LoadReport::default();

        self.read_category(
            Category::Components,
            root,
            entity
                .components_mut()
                .iter_mut()
                .filter_map(|c| c.as_serializable_mut()),
            &mut report,
        );
        self.read_category(
            Category::Controls,
            root,
            entity
                .controls_mut()
                .iter_mut()
                .filter_map(|c| c.as_serializable_mut()),
            &mut report,
        );

        debug!(
            bundle = root.name(),
            restored = report.restored.len(),
            drift = report.drift.len(),
            orphaned = report.orphaned.len(),
            "loaded entity state"
        );

        report
    }

    fn read_category<'a>(
        &self,
        category: Category,
        root: &Bundle,
        members: impl Iterator<Item = &'a mut dyn Serializable>,
        report: &mut LoadReport,
    ) {
        let key = self.config.key(category);

        let Some(category_bundle) = root.get_bundle(key) else {
            let missing: Vec<&str> = members.map(|member| member.type_tag()).collect();
            if missing.is_empty() {
                debug!(%category, key, bundle = root.name(), "no category bundle to load");
                return;
            }

            warn!(
                %category,
                key,
                bundle = root.name(),
                type_tags = ?missing,
                "saved state has no category bundle, serializable members left unchanged"
            );
            for tag in missing {
                report.drift.push(SchemaDrift {
                    member: MemberRef::new(category, tag),
                    kind: DriftKind::MissingCategory,
                });
            }
            return;
        };

        let mut live = Vec::new();
        for member in members {
            let tag = member.type_tag();
            live.push(tag);

            match category_bundle.get_bundle(tag) {
                Some(instance) => {
                    member.read(instance);
                    trace!(%category, type_tag = tag, "restored member");
                    report.restored.push(MemberRef::new(category, tag));
                }
                None => {
                    warn!(
                        %category,
                        type_tag = tag,
                        bundle = category_bundle.name(),
                        "saved state has no instance bundle for serializable member"
                    );
                    report.drift.push(SchemaDrift {
                        member: MemberRef::new(category, tag),
                        kind: DriftKind::MissingInstance,
                    });
                }
            }
        }

        let mut orphaned: Vec<_> = category_bundle
            .keys()
            .filter(|key| !live.iter().any(|tag| tag == key))
            .collect();
        orphaned.sort_unstable();
        for tag in orphaned {
            debug!(%category, type_tag = tag, "saved member state has no live member");
            report.orphaned.push(MemberRef::new(category, tag));
        }
    }
}

/// Save `entity` into `root` with the default category keys.
///
/// See [`EntityStateSerializer::save`].
pub fn save<E>(entity: &E, root: &mut Bundle) -> SaveReport
where
    E: EntityMembers + ?Sized,
{
    EntityStateSerializer::new().save(entity, root)
}

/// Load `entity` from `root` with the default category keys.
///
/// See [`EntityStateSerializer::load`].
pub fn load<E>(entity: &mut E, root: &Bundle) -> LoadReport
where
    E: EntityMembers + ?Sized,
{
    EntityStateSerializer::new().load(entity, root)
}
