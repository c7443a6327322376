use actor_framework::{ActorEntity, Filter, FrameworkError, ResourceActor};
use async_trait::async_trait;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Tap {
    id: String,
    beer: String,
    pints: u32,
}

#[derive(Debug)]
struct TapCreate {
    beer: String,
    pints: u32,
}

#[derive(Debug)]
struct TapUpdate {
    beer: Option<String>,
}

#[derive(Debug)]
enum TapAction {
    Pour(u32),
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum TapError {
    #[error("empty keg")]
    Empty,
    #[error("tap needs a beer name")]
    Unnamed,
}

#[async_trait]
impl ActorEntity for Tap {
    type Id = String;
    type Create = TapCreate;
    type Update = TapUpdate;
    type Action = TapAction;
    type ActionResult = u32;
    type Context = ();
    type Error = TapError;

    fn from_create_params(id: String, params: TapCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            id,
            beer: params.beer,
            pints: params.pints,
        })
    }

    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        if self.beer.is_empty() {
            return Err(TapError::Unnamed);
        }
        Ok(())
    }

    async fn on_update(&mut self, update: TapUpdate, _ctx: &Self::Context) -> Result<(), Self::Error> {
        if let Some(beer) = update.beer {
            self.beer = beer;
        }
        Ok(())
    }

    async fn handle_action(&mut self, action: TapAction, _ctx: &Self::Context) -> Result<u32, Self::Error> {
        match action {
            TapAction::Pour(n) if n > self.pints => Err(TapError::Empty),
            TapAction::Pour(n) => {
                self.pints -= n;
                Ok(self.pints)
            }
        }
    }
}

fn tap(beer: &str, pints: u32) -> TapCreate {
    TapCreate {
        beer: beer.to_string(),
        pints,
    }
}

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let (actor, client) = ResourceActor::<Tap>::new(10);
    let handle = tokio::spawn(actor.run(()));

    // 1. Create under a caller-chosen key
    let id = client.create("T1".to_string(), tap("Stout", 10)).await.unwrap();
    assert_eq!(id, "T1");

    // 2. Action mutates in place
    let left = client.perform_action(id.clone(), TapAction::Pour(3)).await.unwrap();
    assert_eq!(left, 7);

    // 3. Entity errors come back boxed and can be recovered
    let err = client
        .perform_action(id.clone(), TapAction::Pour(99))
        .await
        .unwrap_err();
    assert_eq!(err.downcast_entity::<TapError>().unwrap(), TapError::Empty);

    // 4. Update
    let updated = client
        .update(
            id.clone(),
            TapUpdate {
                beer: Some("Porter".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.beer, "Porter");
    assert_eq!(updated.pints, 7);

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_duplicate_key_is_rejected_and_original_kept() {
    let (actor, client) = ResourceActor::new(10);
    tokio::spawn(actor.run(()));

    client.create("T1".to_string(), tap("Stout", 10)).await.unwrap();
    let err = client
        .create("T1".to_string(), tap("Lager", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::AlreadyExists(id) if id == "T1"));

    let kept: Tap = client.get("T1".to_string()).await.unwrap().unwrap();
    assert_eq!(kept.beer, "Stout");
}

#[tokio::test]
async fn test_failed_on_create_stores_nothing() {
    let (actor, client) = ResourceActor::<Tap>::new(10);
    tokio::spawn(actor.run(()));

    let err = client.create("T1".to_string(), tap("", 5)).await.unwrap_err();
    assert_eq!(err.downcast_entity::<TapError>().unwrap(), TapError::Unnamed);
    assert!(client.get("T1".to_string()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_query_keeps_insertion_order() {
    let (actor, client) = ResourceActor::new(10);
    tokio::spawn(actor.run(()));

    for (id, beer, pints) in [("T3", "Amber", 4), ("T1", "Stout", 0), ("T2", "IPA", 9)] {
        client.create(id.to_string(), tap(beer, pints)).await.unwrap();
    }

    let all: Vec<String> = client
        .query(Filter::all())
        .await
        .unwrap()
        .into_iter()
        .map(|t: Tap| t.id)
        .collect();
    assert_eq!(all, ["T3", "T1", "T2"]);

    let pouring = client.query(Filter::new(|t: &Tap| t.pints > 0)).await.unwrap();
    assert_eq!(pouring.len(), 2);
}

#[tokio::test]
async fn test_unknown_key_is_not_found() {
    let (actor, client) = ResourceActor::<Tap>::new(10);
    tokio::spawn(actor.run(()));

    let err = client
        .perform_action("missing".to_string(), TapAction::Pour(1))
        .await
        .unwrap_err();
    assert!(matches!(err, FrameworkError::NotFound(id) if id == "missing"));
}
